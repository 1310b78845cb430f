//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Posts Terraform plan reports on pull requests as a run task.
#[derive(Parser, Debug)]
#[command(name = "runtask-pr-comment")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the `.env` file.
    #[arg(long, global = true, env = "RUNTASK_ENV_FILE")]
    pub env_file: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the webhook server.
    Serve {
        /// Port to listen on, overriding `PORT`.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Render the report for a plan file and print it.
    Render {
        /// Path to the JSON plan (`terraform show -json`).
        #[arg(long)]
        plan: PathBuf,

        /// Link to the run shown in the report header.
        #[arg(long, default_value = "")]
        run_url: String,

        /// Link to the commit shown in the report header.
        #[arg(long, default_value = "")]
        commit_url: String,
    },
}

/// Log format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
