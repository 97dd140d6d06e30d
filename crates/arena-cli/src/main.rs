//! Roast Arena CLI
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`ARENA_*`)
//! 3. Project config (`.arena/config.toml` in the project root)
//! 4. Global config (`~/.arena/config.toml`)
//! 5. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `ARENA_DEBUG`: Enable debug mode (`true`/`false`)
//! - `ARENA_VERBOSE`: Enable verbose output
//! - `ARENA_COLOR`: Enable colored output
//! - `ARENA_API_BASE`: Arena service base URL
//! - `ARENA_HISTORY_LIMIT`: History entries per refresh (1-100)
//! - `ARENA_LOG_FILE`: Log directory; enables file logging
//! - `ARENA_LOG_LEVEL`: File log level

mod tracing_writer;

use anyhow::Result;
use arena_app::{ArenaApp, SharedPrinterSlot};
use arena_runtime::config::terminal_filter_directive;
use arena_runtime::{ArenaConfig, ConfigError, ConfigLoader, ConfigResolver};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// File name inside the log directory.
const LOG_FILE_NAME: &str = "arena.log";

/// Roast Arena - watch three personas roast your topic, then pick the winner
#[derive(Parser, Debug)]
#[command(name = "arena")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Arena service base URL (also: ARENA_API_BASE)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// History entries fetched per refresh, 1-100 (also: ARENA_HISTORY_LIMIT)
    #[arg(long, value_name = "N")]
    history_limit: Option<u32>,

    /// Project root directory (defaults to current directory)
    #[arg(short = 'C', long)]
    project: Option<PathBuf>,

    /// Override log file directory path; enables file logging (also: ARENA_LOG_FILE)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Override file log level (also: ARENA_LOG_LEVEL, default: debug)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Battle command to run once, e.g. `/dethrone pineapple pizza`
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

/// CLI-based configuration resolver.
///
/// Merges file/env config via [`ConfigLoader`] and applies CLI argument
/// overrides as the highest-priority layer.
struct CliConfigResolver {
    project_root: PathBuf,
    debug: bool,
    verbose: bool,
    base_url: Option<String>,
    history_limit: Option<u32>,
    log_file: Option<PathBuf>,
    log_level: Option<String>,
}

impl CliConfigResolver {
    fn from_args(args: &Args) -> Self {
        let project_root = args.project.clone().unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to get current directory, using '.'");
                PathBuf::from(".")
            })
        });

        Self {
            project_root,
            debug: args.debug,
            verbose: args.verbose,
            base_url: args.base_url.clone(),
            history_limit: args.history_limit,
            log_file: args.log_file.clone(),
            log_level: args.log_level.clone(),
        }
    }

    fn loader(&self) -> ConfigLoader {
        ConfigLoader::new().with_project_root(&self.project_root)
    }

    /// Applies CLI flags. Unset flags leave loaded values alone.
    fn apply_overrides(&self, config: &mut ArenaConfig) {
        if self.debug {
            config.debug = true;
        }
        if self.verbose {
            config.ui.verbose = true;
        }
        if let Some(ref url) = self.base_url {
            config.api.base_url.clone_from(url);
        }
        if let Some(limit) = self.history_limit {
            config.api.history_limit = limit;
        }
        if let Some(ref p) = self.log_file {
            config.logging.file = true;
            config.logging.file_path = Some(p.clone());
        }
        if let Some(ref level) = self.log_level {
            config.logging.file_level.clone_from(level);
        }
    }
}

impl ConfigResolver for CliConfigResolver {
    fn resolve(&self) -> Result<ArenaConfig, ConfigError> {
        let mut config = self.loader().load()?;

        // CLI args override (highest priority)
        self.apply_overrides(&mut config);

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Shared printer slot: links tracing output to rustyline's ExternalPrinter
    let printer_slot = SharedPrinterSlot::new();

    let resolver = CliConfigResolver::from_args(&args);

    // Resolve early for logging settings; the builder resolves again.
    let resolved_config = resolver
        .resolve()
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;

    init_tracing(&resolved_config, &printer_slot);

    info!(path = %resolver.project_root.display(), "Project root");
    if resolved_config.logging.file {
        info!(
            path = %resolved_config.logging.resolved_file_path().join(LOG_FILE_NAME).display(),
            level = %resolved_config.logging.file_level,
            "File logging enabled"
        );
    }

    let app = ArenaApp::builder(resolver)
        .with_printer_slot(printer_slot)
        .build()?;

    info!(
        debug = app.config().debug,
        verbose = app.config().ui.verbose,
        base_url = %app.config().api.base_url,
        "Application initialized"
    );

    if args.command.is_empty() {
        app.run_interactive().await?;
    } else {
        let cmd = args.command.join(" ");
        info!("Command mode: {}", cmd);
        let exit_code = app.run_command(&cmd).await?;
        if exit_code != 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

/// Installs independent terminal and file layers.
///
/// Terminal filter: debug > verbose > `RUST_LOG` > "warn".
/// File filter: `logging.file_level` (default "debug").
/// HTTP crates are capped at warn on both.
fn init_tracing(config: &ArenaConfig, printer_slot: &SharedPrinterSlot) {
    let terminal_filter = if config.debug {
        EnvFilter::new(terminal_filter_directive("debug"))
    } else if config.ui.verbose {
        EnvFilter::new(terminal_filter_directive("info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let terminal_writer = tracing_writer::TerminalMakeWriter::new(printer_slot);
    let terminal_layer = fmt::layer()
        .with_target(false)
        .with_ansi(config.ui.color)
        .with_writer(terminal_writer);

    let log_file = if config.logging.file {
        open_log_file(&config.logging.resolved_file_path())
    } else {
        None
    };

    if let Some(file) = log_file {
        let file_filter = EnvFilter::new(config.logging.file_filter_directive());
        let file_writer = tracing_writer::FileMakeWriter::new(file);
        let file_layer = fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .with_writer(file_writer);

        tracing_subscriber::registry()
            .with(terminal_layer.with_filter(terminal_filter))
            .with(file_layer.with_filter(file_filter))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(terminal_layer.with_filter(terminal_filter))
            .init();
    }
}

/// Opens the persistent log file in the given directory.
///
/// Creates `<log_dir>/arena.log` in append mode.
/// Returns `None` if the directory/file cannot be created (non-fatal).
fn open_log_file(log_dir: &std::path::Path) -> Option<Arc<parking_lot::Mutex<std::fs::File>>> {
    if let Err(e) = std::fs::create_dir_all(log_dir) {
        eprintln!(
            "Warning: cannot create log directory {}: {e}",
            log_dir.display()
        );
        return None;
    }

    let log_path = log_dir.join(LOG_FILE_NAME);

    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => Some(Arc::new(parking_lot::Mutex::new(file))),
        Err(e) => {
            eprintln!("Warning: cannot open log file {}: {e}", log_path.display());
            None
        }
    }
}
