//! linkdash CLI
//!
//! Terminal dashboard and command-line interface for linkdash.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use linkdash_core::{Backend, Config};

mod commands;
mod output;
mod tui;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "linkdash")]
#[command(about = "linkdash - Your links as a dashboard of tiles")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Keep links in memory only (nothing is written to disk)
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard (default)
    Tui,
    /// List all links
    #[command(alias = "ls")]
    List,
    /// Add a link
    Add {
        /// Tile title
        title: String,
        /// URL (https:// is added when no http scheme is given)
        url: String,
    },
    /// Change a link's title and/or URL
    Edit {
        /// Link ID (full UUID or prefix)
        id: String,
        /// New title
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// New URL
        #[arg(short, long)]
        url: Option<String>,
    },
    /// Delete a link
    #[command(alias = "rm")]
    Delete {
        /// Link ID (full UUID or prefix)
        id: String,
    },
    /// Open a link in the browser
    Open {
        /// Link ID (full UUID or prefix)
        id: String,
    },
    /// Show storage location and link count
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, backend, storage_key, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands work without opening storage
    if let Some(Commands::Config { command }) = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Show) | None => commands::config::show(config_path, &output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, config_path, &output)
            }
        };
    }

    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    if cli.ephemeral {
        config.backend = Backend::Memory;
    }

    let command = cli.command.unwrap_or(Commands::Tui);

    if matches!(command, Commands::Tui) {
        // The dashboard owns the terminal, so it logs to a file
        return tui::run(&config);
    }

    init_cli_logging();

    let mut store = commands::open_store(&config, &output)?;

    match command {
        Commands::Tui | Commands::Config { .. } => unreachable!(), // Handled above
        Commands::List => commands::link::list(&store, &output),
        Commands::Add { title, url } => commands::link::add(&mut store, title, url, &output),
        Commands::Edit { id, title, url } => {
            commands::link::edit(&mut store, id, title, url, &output)
        }
        Commands::Delete { id } => commands::link::delete(&mut store, id, &output),
        Commands::Open { id } => commands::link::open(&store, id, &output),
        Commands::Status => commands::status::show(&store, &config, &output),
    }
}

/// Log warnings and errors to stderr; LINKDASH_LOG overrides the level
fn init_cli_logging() {
    let level = std::env::var("LINKDASH_LOG").unwrap_or_else(|_| "warn".to_string());
    let env_filter = EnvFilter::new(format!(
        "linkdash_core={},linkdash={}",
        level, level
    ));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
