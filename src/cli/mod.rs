//! Command-line interface for Taller.

mod commands;

use clap::{Parser, Subcommand};

/// Taller - repair shop service order tracker
#[derive(Parser)]
#[command(name = "taller")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web server (default)
    #[command(alias = "web")]
    Serve,

    /// Create a technician account
    CreateTechnician {
        /// Login name for the new account
        username: String,
        /// Initial password
        #[arg(long)]
        password: String,
    },

    /// Print all service orders, newest first
    #[command(alias = "ls")]
    List {
        /// Only show orders whose client, equipment or status contains this text
        #[arg(long, short)]
        query: Option<String>,
    },

    /// Create a default config.toml in the working directory
    Init,
}

pub use commands::*;
