//! Pomodoro TUI - an aesthetic terminal Pomodoro timer
//!
//! This tool helps you stay focused using the Pomodoro Technique:
//! - 25 minutes of focused work
//! - 5 minutes of short break
//! - 15 minutes of long break after 4 pomodoros

use std::io::BufRead;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::sync::mpsc;

use pomodoro_tui::cli::{listeners, Cli, Commands, ConfigCommand, Display, KeyCommand, RunArgs};
use pomodoro_tui::config::{SettingsProvider, SettingsStore};
use pomodoro_tui::engine::Timer;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_anyhow_error(&e);
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Some(Commands::Run(args)) => run(config_path, args).await,
        Some(Commands::Config(command)) => configure(config_path, command),
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
            Ok(())
        }
        None => run(config_path, RunArgs::default()).await,
    }
}

fn open_store(path: Option<&Path>) -> Result<SettingsStore> {
    let store = match path {
        Some(path) => SettingsStore::open(path),
        None => SettingsStore::open_default(),
    };
    store.context("Failed to load settings")
}

// ============================================================================
// run
// ============================================================================

/// Runs the timer in the foreground until `q`, end of input or Ctrl-C.
async fn run(config_path: Option<&Path>, args: RunArgs) -> Result<()> {
    let store = open_store(config_path)?;
    let mut config = store.timer_config();
    args.duration_update().apply_to(&mut config);
    let audio_enabled = store.audio_enabled() && !args.no_sound;

    let timer = Timer::new(&config);
    listeners::attach(&timer, audio_enabled);

    let mut commands = spawn_stdin_reader()?;
    Display::show_message(KeyCommand::HELP);
    Display::show_status(&timer.get_session_info());

    loop {
        tokio::select! {
            line = commands.recv() => {
                // End of input
                let Some(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<KeyCommand>() {
                    Ok(KeyCommand::Quit) => break,
                    Ok(command) => dispatch(&timer, command).await?,
                    Err(e) => Display::show_message(&format!("{}. {}", e, KeyCommand::HELP)),
                }
            }
            result = tokio::signal::ctrl_c() => {
                result.context("Failed to listen for Ctrl-C")?;
                break;
            }
        }
    }

    stop_timer(&timer).await?;
    println!();
    Ok(())
}

/// Forwards stdin lines from a dedicated thread so the runtime never waits
/// on a blocking read at shutdown.
fn spawn_stdin_reader() -> Result<mpsc::UnboundedReceiver<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })
        .context("Failed to spawn stdin reader")?;
    Ok(rx)
}

async fn dispatch(timer: &Timer, command: KeyCommand) -> Result<()> {
    let accepted = match command {
        KeyCommand::Start => timer.start(),
        KeyCommand::TogglePause => {
            if timer.is_paused() {
                timer.resume()
            } else {
                timer.pause()
            }
        }
        KeyCommand::Skip => timer.skip(),
        KeyCommand::Stop => stop_timer(timer).await?,
        KeyCommand::ResetStats => {
            timer.reset_daily_stats();
            Display::show_status(&timer.get_session_info());
            true
        }
        KeyCommand::Help | KeyCommand::Quit => {
            Display::show_message(KeyCommand::HELP);
            true
        }
    };

    if !accepted {
        Display::show_message(&format!(
            "Cannot {} while {}",
            command.as_str(),
            timer.get_state().display_name().to_lowercase()
        ));
    }
    Ok(())
}

/// Stops the timer off the async thread; stopping waits for the worker.
async fn stop_timer(timer: &Timer) -> Result<bool> {
    let timer = timer.clone();
    tokio::task::spawn_blocking(move || timer.stop())
        .await
        .context("Stop task failed")
}

// ============================================================================
// config
// ============================================================================

fn configure(config_path: Option<&Path>, command: ConfigCommand) -> Result<()> {
    let mut store = open_store(config_path)?;

    match command {
        ConfigCommand::Show { json } => {
            Display::show_settings(store.settings(), json)?;
        }
        ConfigCommand::Reset => {
            store
                .reset_to_defaults()
                .context("Failed to reset settings")?;
            println!("Settings reset to defaults in {}", store.path().display());
        }
        ConfigCommand::Set(args) => {
            let update = args.duration_update();
            if update.is_empty() && args.sound.is_none() {
                anyhow::bail!("Nothing to set; pass at least one option (see --help)");
            }
            if !update.is_empty() {
                store
                    .update_timer(&update)
                    .context("Failed to update timer settings")?;
            }
            if let Some(enabled) = args.sound {
                store
                    .set_audio_enabled(enabled)
                    .context("Failed to update audio settings")?;
            }
            Display::show_settings(store.settings(), false)?;
        }
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
