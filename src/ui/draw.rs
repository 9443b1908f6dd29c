use anyhow::Result;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::{Frame, Terminal};

use crate::config::RgbColor;
use crate::present::{item_id_label, list_id_label};

use super::app::{App, SearchFocus};

const SEARCH_HELP: &str = "Esc: results  Tab: next list  F5: refresh";
const RESULTS_HELP: &str = "/: search  j/k: move  Tab: next list  r: refresh  q: quit";

pub fn render<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    terminal.draw(|frame| draw_frame(frame, app))?;
    Ok(())
}

fn draw_frame(frame: &mut Frame<'_>, app: &App) {
    let size = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(size);

    draw_header(frame, layout[0], app);
    draw_search(frame, layout[1], app);
    draw_list(frame, layout[2], app);
    draw_footer(frame, layout[3], app);
}

fn draw_header(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let header_style = header_text_style(app);
    let mut spans: Vec<Span> = vec![Span::styled(app.source.clone(), header_style)];
    spans.push(Span::raw("   "));

    for (idx, option) in app.groups.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled(" | ", header_style));
        }
        let style = if idx == app.group_index {
            selection_style(app)
        } else {
            header_style
        };
        spans.push(Span::styled(option.label(), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_search(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let active = app.search_focus == SearchFocus::Input;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, active))
        .title(" Search by name or ID ");
    let inner = block.inner(area);

    let paragraph = Paragraph::new(app.search_input.value()).block(block);
    frame.render_widget(paragraph, area);

    if active && inner.width > 0 {
        let cursor = (app.search_input.visual_cursor() as u16).min(inner.width.saturating_sub(1));
        frame.set_cursor_position((inner.x + cursor, inner.y));
    }
}

fn draw_list(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let active = app.search_focus == SearchFocus::Results;
    let title = format!(
        " {} of {} items ",
        app.catalog.visible_len(),
        app.catalog.all_records().len()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app, active))
        .title(title);

    let items: Vec<ListItem> = if app.catalog.visible_len() == 0 {
        let text = if app.is_loading() {
            "Loading..."
        } else if app.catalog.is_empty() {
            "No items"
        } else {
            "No matching items"
        };
        vec![ListItem::new(Line::from(text))]
    } else {
        app.catalog
            .visible_records()
            .map(|record| {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        record.name().to_string(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(list_id_label(record)),
                    Line::from(item_id_label(record)),
                ])
            })
            .collect()
    };

    let mut state = ListState::default();
    if app.catalog.visible_len() > 0 {
        state.select(Some(app.selected));
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(selection_style(app))
        .highlight_symbol(" ")
        .repeat_highlight_symbol(false);

    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_footer(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let help = match app.search_focus {
        SearchFocus::Input => SEARCH_HELP,
        SearchFocus::Results => RESULTS_HELP,
    };
    let selected = match app.search_focus {
        SearchFocus::Results => app.selected_record().map(|record| record.name()),
        SearchFocus::Input => None,
    };
    let message = match selected.or(app.status.as_deref()) {
        Some(status) => format!("{status}  |  {help}"),
        None => help.to_string(),
    };
    let colors = app.ui_colors();
    let style = Style::default()
        .fg(color(colors.status_fg))
        .bg(color(colors.status_bg));

    let background = Block::default().style(Style::default().bg(color(colors.status_bg)));
    frame.render_widget(background, area);

    frame.render_widget(Paragraph::new(message).style(style), area);
}

fn selection_style(app: &App) -> Style {
    let colors = app.ui_colors();
    Style::default()
        .fg(color(colors.selection_fg))
        .bg(color(colors.selection_bg))
}

fn border_style(app: &App, active: bool) -> Style {
    let colors = app.ui_colors();
    let style = Style::default().fg(color(colors.border));
    if active {
        style.add_modifier(Modifier::BOLD)
    } else {
        style.add_modifier(Modifier::DIM)
    }
}

fn header_text_style(app: &App) -> Style {
    let colors = app.ui_colors();
    Style::default().fg(color(colors.border))
}

fn color(rgb: RgbColor) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}
