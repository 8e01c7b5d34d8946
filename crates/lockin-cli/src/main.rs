//! lockin - bench simulator for the Lockin access controller.
//!
//! Wires the controller to a SQLite identity store, a scripted remote
//! authority, a mock bolt and a mock radio, then reads commands from stdin
//! (see [`console`]) and prints one JSON line per handled event. Logs go to
//! stderr.
//!
//! ```text
//! $ lockin --accept 123456,424242 --max-attempts 3
//! 123456
//! {"event":"submission","outcome":"unlocked"}
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use lockin_controller::{AccessController, EventReport, LockEvent, runner};
use lockin_core::ControllerConfig;
use lockin_hardware::ButtonPress;
use lockin_hardware::mock::{MockActuator, MockButtons, MockButtonsHandle};
use lockin_network::mock::{MockAuthority, MockLink, Verdict};
use lockin_storage::{Database, DatabaseConfig, SqliteCredentialStore};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod console;

use console::ConsoleCommand;

/// Bench simulator for the Lockin smart lock
#[derive(Parser, Debug)]
#[command(name = "lockin")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a JSON controller configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the SQLite identity database
    #[arg(long, default_value = "lockin.db")]
    database: String,

    /// Codes the simulated remote authority accepts (comma separated)
    #[arg(long, value_delimiter = ',', default_value = "123456")]
    accept: Vec<String>,

    /// Override the number of failures that trigger a lockout
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Override the lockout penalty in seconds
    #[arg(long)]
    lockout_secs: Option<u64>,

    /// Override the unlock window in milliseconds
    #[arg(long)]
    unlock_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Shorthand for --log-level debug
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let config = load_config(&cli)?;
    let code_length = config.code_length;

    let db = Database::new(DatabaseConfig::new(cli.database.clone()))
        .await
        .with_context(|| format!("Failed to open identity database {}", cli.database))?;
    db.health_check().await.context("Identity database is not usable")?;
    let store = SqliteCredentialStore::new(db.pool().clone());

    let (authority, _authority) = MockAuthority::new(Verdict::AcceptCodes(cli.accept.clone()));
    let (actuator, _actuator) = MockActuator::new();
    let (link, _link) = MockLink::new();
    let (buttons, button_handle) = MockButtons::new();

    let now = Instant::now();
    let mut controller = AccessController::new(config, authority, store, actuator, link, now)
        .context("Invalid controller configuration")?;
    controller.boot(now).await;

    let (event_tx, event_rx) = mpsc::channel(32);
    let (report_tx, report_rx) = mpsc::channel(32);
    let button_events = event_tx.clone();

    info!(code_length, "Simulator ready, reading commands from stdin");
    let ((), (), console, ()) = tokio::join!(
        runner::run(&mut controller, event_rx, report_tx),
        runner::forward_buttons(buttons, button_events),
        read_console(code_length, event_tx, button_handle),
        print_reports(report_rx),
    );

    db.close().await;
    info!("Simulator stopped");
    console
}

fn init_tracing(cli: &Cli) {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&cli.log_level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn load_config(cli: &Cli) -> Result<ControllerConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            ControllerConfig::from_json(&content)?
        }
        None => ControllerConfig::default(),
    };

    if let Some(attempts) = cli.max_attempts {
        config = config.with_max_attempts(attempts);
    }
    if let Some(secs) = cli.lockout_secs {
        config = config.with_lockout_secs(secs);
    }
    if let Some(ms) = cli.unlock_ms {
        config = config.with_unlock_ms(ms);
    }

    config.validate()?;
    Ok(config)
}

/// Feed stdin lines to the controller until EOF.
///
/// Button commands go through the mock button panel so they take the same
/// path as physical presses.
async fn read_console(
    code_length: usize,
    events: mpsc::Sender<LockEvent>,
    buttons: MockButtonsHandle,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let Some(command) = console::parse_line(&line, code_length) else {
            debug!(len = line.trim().len(), "Ignoring console line");
            continue;
        };

        let delivered = match command {
            ConsoleCommand::Code(code) => events.send(LockEvent::SubmitCode(code)).await.is_ok(),
            ConsoleCommand::Pair(token) => events.send(LockEvent::Pair(token)).await.is_ok(),
            ConsoleCommand::Status => events.send(LockEvent::Status).await.is_ok(),
            ConsoleCommand::Manual => buttons.press(ButtonPress::ManualUnlock).await.is_ok(),
            ConsoleCommand::BeginPairing => buttons.press(ButtonPress::Pairing).await.is_ok(),
        };
        if !delivered {
            break;
        }
    }

    info!("Console closed");
    Ok(())
}

async fn print_reports(mut reports: mpsc::Receiver<EventReport>) {
    while let Some(report) = reports.recv().await {
        println!("{}", console::render_report(&report));
    }
}
