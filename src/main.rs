mod catalog;
mod config;
mod fetch;
mod logging;
mod name_key;
mod ordering;
mod present;
mod record;
mod sanitize;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use catalog::Catalog;
use config::Config;
use logging::LogTarget;

#[derive(Parser, Debug)]
#[command(name = "fetchlist", version, about = "Fetch, sort and filter grouped items")]
struct Cli {
    /// Configuration file (defaults to the per-user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Item source: an http(s) URL or a local JSON file. Overrides `[source] url`.
    #[arg(long, global = true, value_name = "URL|PATH")]
    source: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive browser (the default)
    Browse,
    /// Print the sorted items, optionally filtered
    List(ListArgs),
    /// Print the distinct list ids
    Groups,
}

#[derive(Args, Debug)]
#[group(multiple = false)]
struct ListArgs {
    /// Keep items whose id contains this text
    #[arg(long, value_name = "TEXT")]
    id: Option<String>,

    /// Digits match ids, anything else matches names (case-insensitive)
    #[arg(long, short = 'q', value_name = "TEXT")]
    query: Option<String>,

    /// Keep items of one list id
    #[arg(long, value_name = "LIST_ID")]
    group: Option<i64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = config::load(cli.config.as_deref())?;
    if let Some(source) = cli.source {
        config.source_url = source;
    }

    match cli.command.unwrap_or(Command::Browse) {
        Command::Browse => handle_browse(&config),
        Command::List(args) => handle_list(&config, args),
        Command::Groups => handle_groups(&config),
    }
}

fn handle_browse(config: &Config) -> Result<()> {
    logging::init(config, LogTarget::File)?;
    info!(
        source = %config.source_url,
        config = ?config.config_path,
        "starting browser"
    );

    let gateway = fetch::gateway_for(&config.source_url);
    let mut app = ui::app::App::new(config, gateway);
    app.run()
}

/// Fetch once and build the catalog, blocking until the gateway answers.
fn load_catalog(config: &Config) -> Result<Catalog> {
    logging::init(config, LogTarget::Stderr)?;

    let gateway = fetch::gateway_for(&config.source_url);
    let raw = fetch::spawn_fetch(gateway)
        .wait()
        .context("Failed to load items")?;
    Ok(Catalog::from_raw(raw))
}

fn handle_list(config: &Config, args: ListArgs) -> Result<()> {
    let mut catalog = load_catalog(config)?;

    if let Some(query) = args.id.as_deref() {
        catalog.filter_by_id(query);
    } else if let Some(query) = args.query.as_deref() {
        catalog.filter_by_id_or_name(query);
    } else if let Some(group) = args.group {
        catalog.filter_by_group(group);
    }

    if catalog.visible_len() == 0 {
        eprintln!("No items");
    }
    for record in catalog.visible_records() {
        println!("{}", present::row_line(record));
    }
    Ok(())
}

fn handle_groups(config: &Config) -> Result<()> {
    let catalog = load_catalog(config)?;
    for group in catalog.unique_group_ids() {
        println!("{group}");
    }
    Ok(())
}
