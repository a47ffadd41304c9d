//! Camlistore uploader CLI - camli-uploader command

use clap::{Parser, Subcommand};
use anyhow::Result;
use std::path::PathBuf;

mod cmd;
mod util;

/// Camlistore uploader - hand finished files to the upload service
#[derive(Parser)]
#[command(name = "camli-uploader")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/camli/CamliUploader.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write logs to camli-uploader.log in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch directories and enqueue every finished file
    Watch {
        /// Directories to watch (must already exist)
        #[arg(required = true)]
        dirs: Vec<PathBuf>,
        /// Upload service socket
        #[arg(long)]
        socket: Option<PathBuf>,
    },
    /// Watch the directories enabled in the configuration
    Auto {
        /// Root holding DCIM/Camera and gpx (default: home directory)
        #[arg(long)]
        storage_root: Option<PathBuf>,
        /// Upload service socket
        #[arg(long)]
        socket: Option<PathBuf>,
    },
    /// Enqueue a single file
    Enqueue {
        /// File to upload
        file: PathBuf,
        /// Upload service socket
        #[arg(long)]
        socket: Option<PathBuf>,
    },
    /// View and edit preferences
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// List all preference values
    List,
    /// List recognized preference keys
    Keys,
    /// Get a single value
    Get {
        /// Preference key (e.g. camli.host)
        key: String,
    },
    /// Set a single value
    Set {
        /// Preference key (e.g. camli.auto)
        key: String,
        /// New value (true/false for switches, empty to clear text)
        value: String,
    },
    /// Show the config file path
    Path {
        /// Create the file with defaults if missing
        #[arg(long)]
        create: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = util::init_tracing(cli.verbose, cli.log_dir.as_deref())?;

    let config = cli.config;
    match cli.command {
        Commands::Watch { dirs, socket } => cmd::watch::run(&dirs, socket).await,
        Commands::Auto { storage_root, socket } => {
            cmd::auto::run(config, storage_root, socket).await
        }
        Commands::Enqueue { file, socket } => cmd::enqueue::run(&file, socket).await,
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::List => cmd::config::run_list(config).await,
            ConfigCommands::Keys => cmd::config::run_keys().await,
            ConfigCommands::Get { key } => cmd::config::run_get(config, &key).await,
            ConfigCommands::Set { key, value } => cmd::config::run_set(config, &key, &value).await,
            ConfigCommands::Path { create } => cmd::config::run_path(config, create).await,
        },
    }
}
