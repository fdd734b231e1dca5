//! Vendeta: a QR riddle hunt
//!
//! Read the clue, find the spot, scan the code.

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use std::fs::{self, OpenOptions};
use std::io::stdout;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vendeta::config::Config;
use vendeta::scan::ScanContext;
use vendeta::tui::App;
use vendeta::{Game, RiddleCatalog};

/// Riddle hunt: solve each clue by scanning the QR code where it points
#[derive(Debug, Parser)]
#[command(name = "vendeta", version, about)]
struct Args {
    /// Config file (defaults to <config dir>/vendeta/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Riddle catalog file, overrides the config
    #[arg(long, conflicts_with = "single")]
    riddles: Option<PathBuf>,

    /// Plain scanner mode: one stage solved by this payload
    #[arg(long)]
    single: Option<String>,
}

fn init_tracing(filter: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some((log_path, file)) = open_log_file() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();
        tracing::info!(path = %log_path.display(), "Logging initialized");
        return;
    }

    // No log file: stay silent rather than draw over the TUI
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> Option<(PathBuf, fs::File)> {
    let dir = dirs::data_local_dir()?.join("vendeta");
    fs::create_dir_all(&dir).ok()?;
    let path = dir.join("vendeta.log");
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;
    Some((path, file))
}

fn load_catalog(args: &Args, config: &Config) -> anyhow::Result<RiddleCatalog> {
    if let Some(answer) = &args.single {
        return Ok(RiddleCatalog::single(answer)?);
    }
    if let Some(path) = &args.riddles {
        return Ok(RiddleCatalog::load(path)?);
    }
    Ok(config.riddle_catalog()?)
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> std::io::Result<()> {
    while app.running {
        terminal.draw(|frame| app.render(frame))?;
        if !app.handle_input()? {
            break;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    init_tracing(&config.logging.filter);

    let catalog = load_catalog(&args, &config).context("failed to load riddles")?;
    let context = ScanContext::new("Vendeta");
    tracing::info!(session = %context.session_id, version = vendeta::VERSION, "Starting session");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app
    let mut app = App::new(Game::new(catalog), &config, context);

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result?;

    let (solved, total) = app.game.progress();
    tracing::info!(solved, total, stats = ?app.game.stats, "Session ended");
    if app.game.is_finished() {
        println!(
            "\nCongratulations, you escaped! {} riddles in {} scans.\n",
            total, app.game.stats.scans_submitted
        );
    } else {
        println!("\nSolved {} of {} riddles. The hunt is still on.\n", solved, total);
    }

    Ok(())
}
