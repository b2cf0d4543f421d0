use std::io;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use shapeload::app::App;
use shapeload::config::{self, CliArgs, Config};
use shapeload::error::ShapeLoadError;
use shapeload::event::EventHandler;
use shapeload::ui;

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

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(&config.general.log_level);

    info!(
        delay_ms = config.loading.delay_ms,
        fps = config.appearance.fps,
        "shapeload starting"
    );

    // Setup terminal
    enable_raw_mode()
        .map_err(|e| ShapeLoadError::Terminal(format!("Failed to enable raw mode: {}", e)))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut event_handler = EventHandler::new(config.tick_rate_ms());
    let mut app = App::new(&config);

    // ── Main event loop ───────────────────────────────────────────────
    let result = run(&mut terminal, &mut event_handler, &mut app).await;
    event_handler.stop();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("shapeload exiting");
    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    events: &mut EventHandler,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .wrap_err("Failed to draw frame")?;

        let Some(event) = events.next().await else {
            return Ok(());
        };
        app.handle_event(event);

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Install a panic hook that restores the terminal before printing the panic
fn install_panic_hook() {
    color_eyre::install().ok();
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        // Call default handler
        default_hook(panic_info);
    }));
}

/// Initialize tracing to a log file in the data directory.
/// Can't log to stdout in a TUI.
fn init_logging(level: &str) -> WorkerGuard {
    use tracing_subscriber::EnvFilter;

    let appender = tracing_appender::rolling::never(Config::log_dir(), "shapeload.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    guard
}
