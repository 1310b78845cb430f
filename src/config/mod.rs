//! Configuration module for the run task service.
//!
//! This module handles all configuration-related functionality:
//! - Loading the optional `.env` file
//! - Reading settings from environment variables
//! - Validating values before any client is built

mod parser;
mod settings;

pub use parser::{
    ENV_GITHUB_API_URL, ENV_GITHUB_APP_ID, ENV_GITHUB_APP_INSTALLATION_ID,
    ENV_GITHUB_APP_PRIVATE_KEY, ENV_GITHUB_GRAPHQL_URL, ENV_GITHUB_TOKEN, ENV_HMAC_KEY, ENV_PORT,
    ENV_TIMEOUT_SECS, SettingsLoader,
};
pub use settings::{
    DEFAULT_GITHUB_API_URL, DEFAULT_GITHUB_GRAPHQL_URL, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS,
    GitHubAuth, GitHubSettings, Settings,
};
