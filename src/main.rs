use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use arboard::Clipboard;
use clap::Parser;
use ratatui::DefaultTerminal;
use tracing::{error, info, instrument, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod controller;
mod dataset;
mod domain;
mod inputter;
mod model;
mod pagination;
mod ui;
mod view_state;

use controller::Controller;
use dataset::{Dataset, Game};
use domain::{AppConfig, GSError};
use model::{Model, Status};
use ui::TableUI;
use view_state::PageSize;

/// Browse generated betting activity per game.
#[derive(Parser, Debug)]
#[command(name = "gs", version, about)]
struct Cli {
    /// Seed for the generated data. A random seed is used and logged when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Game shown at start-up
    #[arg(short, long, default_value = "Dice")]
    filter: Game,

    /// Rows per page: 10, 20 or 30
    #[arg(short, long, default_value = "10")]
    rows: PageSize,

    /// Games offered in the filter bar, e.g. dice,mines,wheel. Defaults to all games.
    #[arg(long, value_delimiter = ',')]
    quick_filters: Vec<Game>,

    /// Event poll interval in milliseconds
    #[arg(long, default_value_t = 100)]
    poll_ms: u64,

    #[arg(long, default_value = "~/.game-sections.log")]
    log_file: String,
}

impl From<Cli> for AppConfig {
    fn from(cli: Cli) -> Self {
        let quick_filters = if cli.quick_filters.is_empty() {
            Game::ALL.to_vec()
        } else {
            cli.quick_filters
        };
        AppConfig::default()
            .event_poll_time(cli.poll_ms)
            .seed(cli.seed)
            .initial_filter(cli.filter)
            .initial_page_size(cli.rows)
            .quick_filters(quick_filters)
            .log_file(cli.log_file)
    }
}

fn main() -> ExitCode {
    let config = AppConfig::from(Cli::parse());
    match run(&config) {
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn run(config: &AppConfig) -> Result<(), GSError> {
    init_logging(&config.log_file)?;
    info!("Starting gs!");

    let mut model = Model::init(config, Dataset::seeded(config.seed))?;
    match Clipboard::new() {
        Ok(clipboard) => model = model.with_clipboard(clipboard),
        Err(e) => warn!("Clipboard not available: {e}"),
    }

    let mut terminal = ratatui::try_init()?;
    let result = event_loop(config, &mut model, &mut terminal);
    ratatui::restore();
    result
}

#[instrument(skip_all)]
fn event_loop(
    config: &AppConfig,
    model: &mut Model,
    terminal: &mut DefaultTerminal,
) -> Result<(), GSError> {
    let mut ui = TableUI::new();
    let controller = Controller::new(config);

    while model.status != Status::QUITTING {
        // Render the current view
        terminal.draw(|f| ui.draw(model, f))?;

        // Handle events and map to a Message
        let message = controller.handle_event(model)?;
        model.update(message)?;
    }
    info!("Quitting gs at {:?}", model.view_state());
    Ok(())
}

fn expand_path(path: &str) -> Result<PathBuf, GSError> {
    shellexpand::full(path)
        .map(|p| PathBuf::from(p.as_ref()))
        .map_err(|e| GSError::LoggingFailed(e.to_string()))
}

// The terminal belongs to the UI, so all logs go to a file.
fn init_logging(log_file: &str) -> Result<(), GSError> {
    let path = expand_path(log_file)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Arc::new(file)).with_ansi(false))
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| GSError::LoggingFailed(e.to_string()))
}
