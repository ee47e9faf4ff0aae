//! tmap - Terminal Table Map Editor
//!
//! Opens a main window from which a 16x16 numeric table can be edited,
//! interpolated and smoothed. Settings are read from a JSON file.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tmap::application::App;
use tmap::infrastructure::SettingsRepository;
use tmap::presentation::{render_ui, InputHandler};

#[derive(Parser)]
#[command(name = "tmap", version, about = "Terminal editor for 16x16 numeric table maps")]
struct Cli {
    /// Settings file (JSON); missing means defaults
    #[arg(short, long, default_value = "tmap.json")]
    config: PathBuf,

    /// Write logs to this file
    #[arg(short, long)]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(ref path) = cli.log {
        init_logging(path)?;
    }

    let settings = SettingsRepository::load_settings(&cli.config)
        .with_context(|| format!("loading settings from {}", cli.config.display()))?;
    info!(config = %cli.config.display(), "tmap starting");

    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(settings, cli.config);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(%err, "event loop failed");
        println!("{err:?}");
    }

    info!("tmap exiting");
    Ok(())
}

/// Logs go to a file so they never draw over the terminal UI.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// `RUST_LOG` directives when given and valid, otherwise `tmap=info`.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new("tmap=info"))
}

/// Draws, waits for one event, handles it, until the user exits.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| render_ui(f, app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                InputHandler::handle_key_event(app, key.code, key.modifiers);
            }
            Event::Mouse(mouse) => {
                let size = terminal.size()?;
                let screen = Rect::new(0, 0, size.width, size.height);
                InputHandler::handle_mouse_event(app, mouse, screen);
            }
            _ => {}
        }
    }
    Ok(())
}
