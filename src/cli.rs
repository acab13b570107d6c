//! Command line definitions.

use clap::{Parser, Subcommand};

/// rosterwatch: watch the presence of a roster and notify on transitions
#[derive(Debug, Parser)]
#[command(name = "rosterwatch", version, about, long_about = None)]
pub struct Cli {
    /// Base configuration file, without extension
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay loaded from `config/<env>`
    #[arg(short, long, env = "ROSTERWATCH_ENV", default_value = "development")]
    pub env: String,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Top-level commands
#[derive(Debug, Clone, Copy, Default, Subcommand)]
pub enum Command {
    /// Poll presence until interrupted (default)
    #[default]
    Run,
    /// Send a sample notification through the configured outputs
    TestNotification,
}
