use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use mediastack_wizard::control::ControlClient;
use mediastack_wizard::error::{Result, WizardError};
use mediastack_wizard::event::{Event, EventHandler};
use mediastack_wizard::setup::{ConfigPatch, SetupStore, StateFile};
use mediastack_wizard::system;
use mediastack_wizard::wizard::{WizardApp, WizardSettings};
use ratatui::prelude::*;
use std::io::stdout;
use std::panic;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mediastack-wizard")]
#[command(author, version, about = "Terminal setup wizard for a self-hosted media stack")]
struct Args {
    /// Path to settings file (default: /etc/mediastack/wizard.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Never contact the control server; files are still written
    #[arg(long)]
    dryrun: bool,

    /// Log file path (logging disabled if not specified)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Where the wizard state is kept between runs
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Directory for the generated .env, compose and proxy files
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Start over, keeping saved profiles
    #[arg(long)]
    reset: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(ref log_path) = args.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .ok();

        if let Some(file) = file {
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .with_ansi(false)
                .init();

            info!("Starting mediastack-wizard");
        }
    }

    let mut settings = match args.config.as_deref() {
        Some(path) => WizardSettings::load_from(path)?,
        None => WizardSettings::load().unwrap_or_else(|e| {
            warn!("Ignoring unreadable settings: {}", e);
            WizardSettings::default()
        }),
    };
    if args.dryrun {
        settings.general.dryrun = true;
    }
    if let Some(dir) = args.output_dir.clone() {
        settings.output.directory = dir;
    }

    let state_file = match args.state_file.clone().or_else(|| settings.output.state_file.clone()) {
        Some(path) => StateFile::new(path),
        None => StateFile::default_location(),
    };

    let store = load_store(&state_file, &settings, args.reset);
    let control = if settings.is_dryrun() || !settings.control.enabled {
        ControlClient::offline()
    } else {
        ControlClient::new(&settings.control.url, settings.control.timeout())?
    };

    // Restore the terminal before anything is printed
    let state_path = state_file.path().to_path_buf();
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown location".to_string());
        eprintln!("mediastack-wizard crashed at {location}");
        eprintln!("Your progress (without secrets) is in {}", state_path.display());
        error!("panic at {}: {}", location, panic_info);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut app = WizardApp::new(settings, store, control);

    let result = run_wizard(&mut terminal, &mut app, &state_file).await;

    restore_terminal()?;

    if let Err(ref e) = result {
        error!("Wizard error: {}", e);
    }
    if let Err(e) = state_file.save(&app.store) {
        error!("Failed to save wizard state: {}", e);
    }

    result
}

/// Saved state, or a fresh store prefilled with the invoking user's ids
fn load_store(state_file: &StateFile, settings: &WizardSettings, reset: bool) -> SetupStore {
    let saved = match state_file.load() {
        Ok(saved) => saved,
        Err(e) => {
            warn!("Ignoring unreadable wizard state {:?}: {}", state_file.path(), e);
            None
        }
    };

    match saved {
        Some(mut store) => {
            if reset {
                info!("Resetting saved session");
                store.reset_wizard();
            }
            store
        }
        None => {
            let mut store = SetupStore::new();
            if settings.defaults.detect_ids {
                let ids = system::current_ids();
                if ids.is_root() {
                    info!("Running as root, keeping default PUID/PGID");
                } else {
                    store.update_config(ConfigPatch::ids(&ids.puid(), &ids.pgid()));
                }
            }
            store
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode().map_err(|e| WizardError::Terminal(e.to_string()))?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| WizardError::Terminal(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).map_err(|e| WizardError::Terminal(e.to_string()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().map_err(|e| WizardError::Terminal(e.to_string()))?;
    execute!(stdout(), LeaveAlternateScreen).map_err(|e| WizardError::Terminal(e.to_string()))?;
    Ok(())
}

async fn run_wizard(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut WizardApp,
    state_file: &StateFile,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut events = EventHandler::new(tick_rate);
    let mut saved_revision = app.store.revision();

    loop {
        terminal
            .draw(|frame| mediastack_wizard::wizard::ui::draw(frame, app))
            .map_err(|e| WizardError::Terminal(e.to_string()))?;

        match events.next().await {
            Some(Event::Key(key)) => {
                if let Some(action) = app.handle_key(key) {
                    app.perform(action);
                }
            }
            Some(Event::Resize) => {}
            Some(Event::Tick) => app.tick(),
            None => break,
        }

        if app.store.revision() != saved_revision {
            if let Err(e) = state_file.save(&app.store) {
                warn!("Failed to save wizard state: {}", e);
                app.set_error(format!("Could not save progress: {e}"));
            }
            saved_revision = app.store.revision();
        }

        if app.should_exit {
            break;
        }
    }

    Ok(())
}
