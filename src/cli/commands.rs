//! Command definitions and structures for the CLI
//!
//! Contains the clap-based argument definitions for the standalone runner.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::webhook::ServerStatus;

/// Main CLI structure
#[derive(Parser)]
#[command(name = "connect-notify")]
#[command(about = "Discord webhook notifications for Minekube Connect server status")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Folder holding this notifier's config.yml
    #[arg(long, global = true, env = "CONNECT_NOTIFY_DATA_DIR", default_value = "plugins/connect-notify")]
    pub data_dir: PathBuf,

    /// Folder holding the Connect plugin (defaults to the data folder's parent)
    #[arg(long, global = true, env = "CONNECT_NOTIFY_PLUGINS_DIR")]
    pub plugins_dir: Option<PathBuf>,

    /// Platform name reported in logs
    #[arg(long, global = true, default_value = "Standalone")]
    pub platform_name: String,

    /// Maximum player count shown in notifications
    #[arg(long, global = true, default_value = "20")]
    pub max_players: u32,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Write the default config.yml
    Init {
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show the loaded configuration and resolved Connect endpoint
    Check,

    /// Send one status notification to every configured webhook
    Notify {
        /// Which notification to send
        #[arg(value_enum)]
        status: StatusArg,
    },

    /// Send the online notification, wait for Ctrl+C, then send the offline one
    Run,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Online,
    Offline,
}

impl From<StatusArg> for ServerStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Online => ServerStatus::Online,
            StatusArg::Offline => ServerStatus::Offline,
        }
    }
}
