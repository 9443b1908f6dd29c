use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{debug, info};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use crate::catalog::Catalog;
use crate::config::{Config, UiColors};
use crate::fetch::{spawn_fetch, FetchError, FetchGateway, FetchResult, PendingFetch};
use crate::present::{group_options, GroupOption};
use crate::record::Record;

use super::draw;
use super::keys::{matches_any, matches_any_named};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    Input,
    Results,
}

pub struct App<'a> {
    config: &'a Config,
    gateway: Arc<dyn FetchGateway>,
    pending: Option<PendingFetch>,
    pub catalog: Catalog,
    pub source: String,
    pub search_input: Input,
    pub search_focus: SearchFocus,
    pub groups: Vec<GroupOption>,
    pub group_index: usize,
    pub selected: usize,
    pub status: Option<String>,
}

impl<'a> App<'a> {
    /// Creates the browser and starts the first fetch.
    pub fn new(config: &'a Config, gateway: Arc<dyn FetchGateway>) -> Self {
        let catalog = Catalog::new();
        let groups = group_options(&catalog);
        let mut app = Self {
            config,
            source: gateway.describe(),
            gateway,
            pending: None,
            catalog,
            search_input: Input::default(),
            search_focus: SearchFocus::Input,
            groups,
            group_index: 0,
            selected: 0,
            status: None,
        };
        app.refresh();
        app
    }

    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal);

        disable_raw_mode()?;
        terminal.backend_mut().execute(LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn event_loop<B>(&mut self, terminal: &mut Terminal<B>) -> Result<()>
    where
        B: ratatui::backend::Backend,
    {
        loop {
            self.poll_fetch();
            draw::render(terminal, self)?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if self.handle_key(key) {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a fetch unless one is already running.
    pub fn refresh(&mut self) {
        if self.pending.is_some() {
            self.set_status("Already loading");
            return;
        }
        self.pending = Some(spawn_fetch(Arc::clone(&self.gateway)));
        self.set_status("Loading items...");
    }

    pub fn poll_fetch(&mut self) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        if let Some(result) = pending.poll() {
            self.pending = None;
            self.apply_fetch_result(result);
        }
    }

    /// A successful fetch replaces the catalog and resets both inputs; a
    /// failed one only reports.
    pub fn apply_fetch_result(&mut self, result: FetchResult) {
        match result {
            Ok(raw) => {
                self.catalog.load(raw);
                self.groups = group_options(&self.catalog);
                self.group_index = 0;
                self.search_input = Input::default();
                self.selected = 0;
                info!(
                    records = self.catalog.all_records().len(),
                    "catalog replaced"
                );
                self.set_status(format!(
                    "Loaded {} items",
                    self.catalog.all_records().len()
                ));
            }
            Err(err @ FetchError::Status { .. }) => {
                debug!(error = %err, "keeping previous catalog");
                self.set_status("Failed to load items");
            }
            Err(err) => {
                debug!(error = %err, "keeping previous catalog");
                self.set_status(format!("Error: {err}"));
            }
        }
    }

    /// Returns true when the browser should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            return true;
        }

        match self.search_focus {
            SearchFocus::Input => self.handle_search_input_key(key),
            SearchFocus::Results => self.handle_results_key(key),
        }
    }

    fn handle_search_input_key(&mut self, key: KeyEvent) -> bool {
        let config = self.config;
        let keys = &config.keys;

        if matches_any_named(&key, &keys.cancel) || matches!(key.code, KeyCode::Enter) {
            self.search_focus = SearchFocus::Results;
            return false;
        }
        if matches_any_named(&key, &keys.next) {
            self.move_selection(1);
        } else if matches_any_named(&key, &keys.prev) {
            self.move_selection(-1);
        } else if matches_any_named(&key, &keys.group_next) {
            self.cycle_group(1);
        } else if matches_any_named(&key, &keys.group_prev) {
            self.cycle_group(-1);
        } else if matches_any_named(&key, &keys.refresh) {
            self.refresh();
        } else if let Some(change) = self.search_input.handle_event(&Event::Key(key)) {
            if change.value {
                self.on_search_changed();
            }
        }
        false
    }

    fn handle_results_key(&mut self, key: KeyEvent) -> bool {
        let config = self.config;
        let keys = &config.keys;

        if matches_any(&key, &keys.quit) {
            return true;
        }
        if matches_any(&key, &keys.search) {
            self.search_focus = SearchFocus::Input;
        } else if matches_any(&key, &keys.next) {
            self.move_selection(1);
        } else if matches_any(&key, &keys.prev) {
            self.move_selection(-1);
        } else if matches_any(&key, &keys.group_next) {
            self.cycle_group(1);
        } else if matches_any(&key, &keys.group_prev) {
            self.cycle_group(-1);
        } else if matches_any(&key, &keys.refresh) {
            self.refresh();
        } else if matches_any(&key, &keys.cancel) {
            self.search_input = Input::default();
            self.on_search_changed();
        }
        false
    }

    fn on_search_changed(&mut self) {
        self.catalog.filter_by_id_or_name(self.search_input.value());
        debug!(filter = ?self.catalog.active_filter(), "search changed");
        self.selected = 0;
        self.set_status(format!("{} matching", self.catalog.visible_len()));
    }

    pub fn cycle_group(&mut self, delta: isize) {
        let len = self.groups.len();
        if len == 0 {
            return;
        }
        let index = self.group_index as isize + delta;
        self.group_index = index.rem_euclid(len as isize) as usize;
        self.groups[self.group_index].apply(&mut self.catalog);
        self.selected = 0;
        self.set_status(format!(
            "{}: {} items",
            self.groups[self.group_index].label(),
            self.catalog.visible_len()
        ));
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.catalog.visible_len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let target = (self.selected as isize + delta).clamp(0, len as isize - 1);
        self.selected = target as usize;
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.catalog.visible_record(self.selected)
    }

    pub fn selected_group(&self) -> GroupOption {
        self.groups
            .get(self.group_index)
            .copied()
            .unwrap_or(GroupOption::All)
    }

    pub fn ui_colors(&self) -> &UiColors {
        &self.config.ui.colors
    }

    fn set_status<S: Into<String>>(&mut self, message: S) {
        self.status = Some(message.into());
    }
}
