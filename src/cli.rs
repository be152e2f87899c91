//! CLI argument definitions using clap

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "roberta-admin")]
#[command(author, version, about = "Open Roberta server admin CLI", long_about = None)]
pub struct Cli {
    /// Server base URL (e.g., http://localhost:1999)
    #[arg(short, long, global = true)]
    pub server: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long, global = true)]
    pub timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print the full server reply as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask the server to update the robot firmware
    UpdateFirmware,

    /// Set the token used to pair the server with a robot
    SetToken {
        /// Token shown on the robot
        token: String,
    },

    /// Set the robot type (e.g., ev3, nxt)
    SetRobot {
        /// Robot type name
        robot: String,
    },

    /// Show or change stored client configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Store the default server URL
    SetServer {
        /// Server base URL
        url: String,
    },

    /// Store the default request timeout
    SetTimeout {
        /// Timeout in seconds
        secs: u64,
    },

    /// Delete the stored configuration
    Reset,
}
