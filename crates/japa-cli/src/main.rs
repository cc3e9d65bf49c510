//! japa CLI
//!
//! Command-line interface for japa - local-first mantra counting.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use japa_core::{Config, SPIRITUAL_SYMBOLS};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "japa")]
#[command(about = "japa - Local-first mantra counter with a portable identity")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up an identity on this device (first-time setup)
    Init {
        /// Spiritual name for a new identity
        #[arg(long, requires = "symbol", conflicts_with = "join")]
        name: Option<String>,
        /// Symbol id for a new identity (see `japa symbols`)
        #[arg(long, requires = "name")]
        symbol: Option<String>,
        /// Join an existing identity with a transfer code
        #[arg(long)]
        join: Option<String>,
    },
    /// Record recitations
    #[command(alias = "add")]
    Count {
        /// Number of recitations
        #[arg(default_value_t = 1)]
        amount: u64,
    },
    /// Show identity, counts and storage
    Status,
    /// Identity management
    Identity {
        #[command(subcommand)]
        command: Option<IdentityCommands>,
    },
    /// Move your journey between devices
    Transfer {
        #[command(subcommand)]
        command: TransferCommands,
    },
    /// Write a JSON backup of your journey
    Backup {
        /// Output file (default: mantra-journey-<date>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show or change the theme preference
    Theme {
        #[command(subcommand)]
        command: Option<ThemeCommands>,
    },
    /// List the available symbols
    Symbols,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum IdentityCommands {
    /// Show the identity on this device
    Show,
    /// Check whether an id is well-formed
    Verify {
        /// The id to check
        id: String,
    },
    /// Forget the identity on this device (change identity)
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum TransferCommands {
    /// Print a transfer code for this device
    Export,
    /// Import a transfer code from another device
    Import {
        /// The transfer code
        code: String,
    },
}

#[derive(Subcommand, Clone)]
enum ThemeCommands {
    /// Show the current theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Set the theme
    Set {
        /// light or dark
        value: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, log_file, language)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let result = run(Cli::parse()).await;
    if let Err(e) = &result {
        if let Some(hint) = commands::storage_hint(e) {
            eprintln!("Hint: {}", hint);
        }
    }
    result
}

async fn run(cli: Cli) -> Result<()> {
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands work even if the config file is broken
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config = Config::load_with_cli_override(config_path)?;
    init_logging(&config);

    let Some(command) = cli.command else {
        // No command: status, or first-time setup when there is no identity yet
        let store = commands::open_store(&config)?;
        if store.identity()?.is_none() && output.should_prompt() {
            drop(store);
            return commands::init::run_first_time_setup(&config, &output).await;
        }
        return commands::status::show(&config, &output);
    };

    match command {
        Commands::Init { name, symbol, join } => match (name, symbol, join) {
            (_, _, Some(code)) => commands::init::join(&config, &code, &output),
            (Some(name), Some(symbol), None) => {
                commands::init::create(&config, &name, &symbol, &output).await
            }
            _ => commands::init::run_first_time_setup(&config, &output).await,
        },
        Commands::Count { amount } => commands::count::record(&config, amount, &output),
        Commands::Status => commands::status::show(&config, &output),
        Commands::Identity { command } => handle_identity_command(command, &config, &output),
        Commands::Transfer { command } => match command {
            TransferCommands::Export => commands::transfer::export(&config, &output),
            TransferCommands::Import { code } => {
                commands::transfer::import(&config, &code, &output)
            }
        },
        Commands::Backup { output: path } => commands::backup::write(&config, path, &output),
        Commands::Theme { command } => match command {
            Some(ThemeCommands::Show) | None => commands::theme::show(&config, &output),
            Some(ThemeCommands::Toggle) => commands::theme::toggle(&config, &output),
            Some(ThemeCommands::Set { value }) => commands::theme::set(&config, &value, &output),
        },
        Commands::Symbols => {
            output.print_symbols(&SPIRITUAL_SYMBOLS);
            Ok(())
        }
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_identity_command(
    command: Option<IdentityCommands>,
    config: &Config,
    output: &Output,
) -> Result<()> {
    match command {
        Some(IdentityCommands::Show) | None => commands::identity::show(config, output),
        Some(IdentityCommands::Verify { id }) => commands::identity::verify(&id, output),
        Some(IdentityCommands::Clear { yes }) => commands::identity::clear(config, yes, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging
///
/// Only initializes if JAPA_LOG environment variable is set (value is the
/// level). Logs to config.log_file when set, otherwise stderr.
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("JAPA_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!("japa_core={},japa={}", log_level, log_level));

    // Ignore error if already initialized
    match &config.log_file {
        Some(log_path) => {
            let log_file = match File::create(log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
                    return;
                }
            };
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(log_file))
                .try_init();
            info!("Logging to {:?}", log_path);
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
