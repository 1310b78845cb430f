//! CLI module for the run task service.
//!
//! This module provides the command-line interface for serving the webhook
//! and rendering reports locally.

mod commands;

pub use commands::{Cli, Commands, LogFormat};
