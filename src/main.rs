mod animation;
mod app;
mod audio;
mod clock;
mod config;
mod error;
mod event;
mod notify;
mod render;
mod stage;
mod ui;

use std::io;
use std::path::Path;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use crate::app::App;
use crate::clock::MonotonicClock;
use crate::config::CliArgs;
use crate::error::FxError;
use crate::event::{Event, EventHandler};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliArgs::parse();

    if cli.print_default_config {
        print!("{}", config::default_config_toml());
        return Ok(());
    }

    // Initialize color-eyre with custom panic hook that restores terminal
    install_panic_hook();

    let config = config::load(&cli)?;

    // Guard must outlive the event loop or buffered lines are lost
    let _log_guard = init_logging(cli.log.as_deref(), &config.general.log_level)?;

    info!(fps = config.appearance.fps, "glowtext starting");

    // Setup terminal
    enable_raw_mode()
        .map_err(|e| FxError::Terminal(format!("Failed to enable raw mode: {}", e)))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut event_handler = EventHandler::new(config.tick_rate_ms());
    let mut app = App::new(config, Box::new(MonotonicClock::new()));

    let result = run(&mut terminal, &mut app, &mut event_handler).await;
    event_handler.stop();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!(cues = app.cues.total(), "glowtext exiting");
    result
}

// ── Main event loop ───────────────────────────────────────────────────

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<()> {
    terminal.draw(|f| ui::draw(f, app))?;

    while let Some(event) = events.next().await {
        let redraw = matches!(event, Event::Tick | Event::Resize(..));
        app.handle_event(event);

        if app.should_quit {
            break;
        }
        if redraw {
            terminal.draw(|f| ui::draw(f, app))?;
        }
    }
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call default handler
        default_hook(panic_info);
    }));
    color_eyre::install().ok();
}

/// Initialize tracing to a log file. Without `--log` nothing is recorded,
/// stdout belongs to the TUI.
fn init_logging(log_path: Option<&Path>, level: &str) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::EnvFilter;

    let Some(path) = log_path else {
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| FxError::Config(format!("Invalid log path: {}", path.display())))?;
    std::fs::create_dir_all(dir)
        .wrap_err_with(|| format!("Failed to create log directory: {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(Some(guard))
}
