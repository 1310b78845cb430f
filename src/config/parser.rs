//! Settings loader.
//!
//! This module reads settings from environment variables, optionally
//! seeded from a `.env` file, and validates them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, info};

use crate::error::{ConfigError, Result};

use super::settings::{
    DEFAULT_GITHUB_API_URL, DEFAULT_GITHUB_GRAPHQL_URL, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS,
    GitHubAuth, GitHubSettings, Settings,
};

/// Environment variable holding the listen port.
pub const ENV_PORT: &str = "PORT";
/// Environment variable holding the GitHub token.
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_OAUTH_TOKEN";
/// Environment variable holding the GitHub App ID.
pub const ENV_GITHUB_APP_ID: &str = "GITHUB_APP_ID";
/// Environment variable holding the base64-encoded GitHub App private key.
pub const ENV_GITHUB_APP_PRIVATE_KEY: &str = "GITHUB_APP_PRIVATE_KEY";
/// Environment variable holding the GitHub App installation ID.
pub const ENV_GITHUB_APP_INSTALLATION_ID: &str = "GITHUB_APP_INSTALLATION_ID";
/// Environment variable overriding the GitHub REST API URL.
pub const ENV_GITHUB_API_URL: &str = "GITHUB_API_URL";
/// Environment variable overriding the GitHub GraphQL URL.
pub const ENV_GITHUB_GRAPHQL_URL: &str = "GITHUB_GRAPHQL_URL";
/// Environment variable holding the run task HMAC key.
pub const ENV_HMAC_KEY: &str = "TFC_RUN_TASK_HMAC_KEY";
/// Environment variable overriding the request timeout.
pub const ENV_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";

/// Loader for service settings.
#[derive(Debug, Default)]
pub struct SettingsLoader {
    /// Location of the `.env` file.
    env_file: Option<PathBuf>,
}

impl SettingsLoader {
    /// Creates a loader that reads `.env` from the working directory.
    #[must_use]
    pub const fn new() -> Self {
        Self { env_file: None }
    }

    /// Sets the `.env` file location.
    #[must_use]
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Loads the `.env` file if present.
    ///
    /// Variables already set in the process environment take precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .env_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| ConfigError::DotenvError {
                message: e.to_string(),
                location: env_path.display().to_string(),
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }

    /// Loads `.env`, then reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `.env` is invalid or a setting is missing or
    /// unusable.
    pub fn load(&self) -> Result<Settings> {
        self.load_dotenv()?;
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value is
    /// unusable.
    pub fn from_lookup<F>(lookup: F) -> Result<Settings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &str| {
            get(name).ok_or_else(|| ConfigError::MissingEnvVar {
                name: name.to_string(),
            })
        };

        let port = match get(ENV_PORT) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid(ENV_PORT, e.to_string()))?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get(ENV_TIMEOUT_SECS) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::invalid(ENV_TIMEOUT_SECS, e.to_string()))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ConfigError::invalid(ENV_TIMEOUT_SECS, "must be greater than zero").into());
        }

        let settings = Settings {
            port,
            hmac_key: required(ENV_HMAC_KEY)?,
            request_timeout: Duration::from_secs(timeout_secs),
            github: GitHubSettings {
                auth: github_auth(&get)?,
                api_url: get(ENV_GITHUB_API_URL)
                    .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
                graphql_url: get(ENV_GITHUB_GRAPHQL_URL)
                    .unwrap_or_else(|| DEFAULT_GITHUB_GRAPHQL_URL.to_string()),
            },
        };

        debug!("Loaded settings: {settings:?}");
        Ok(settings)
    }

    /// Returns the configured `.env` location, if any.
    #[must_use]
    pub fn env_file(&self) -> Option<&Path> {
        self.env_file.as_deref()
    }
}

/// Picks the GitHub authentication mode.
///
/// A token wins when set; otherwise all three App variables are required.
fn github_auth<F>(get: &F) -> Result<GitHubAuth>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = get(ENV_GITHUB_TOKEN) {
        return Ok(GitHubAuth::Token(token.trim().to_string()));
    }

    let (Some(app_id), Some(private_key), Some(installation_id)) = (
        get(ENV_GITHUB_APP_ID),
        get(ENV_GITHUB_APP_PRIVATE_KEY),
        get(ENV_GITHUB_APP_INSTALLATION_ID),
    ) else {
        return Err(ConfigError::MissingGitHubAuth {
            token: ENV_GITHUB_TOKEN,
            app_id: ENV_GITHUB_APP_ID,
            private_key: ENV_GITHUB_APP_PRIVATE_KEY,
            installation_id: ENV_GITHUB_APP_INSTALLATION_ID,
        }
        .into());
    };

    let parse_id = |name: &str, raw: &str| {
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::invalid(name, e.to_string()))
    };

    let private_key = STANDARD
        .decode(private_key.trim())
        .map_err(|e| ConfigError::invalid(ENV_GITHUB_APP_PRIVATE_KEY, e.to_string()))?;

    Ok(GitHubAuth::App {
        app_id: parse_id(ENV_GITHUB_APP_ID, &app_id)?,
        installation_id: parse_id(ENV_GITHUB_APP_INSTALLATION_ID, &installation_id)?,
        private_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RunTaskError;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = SettingsLoader::from_lookup(lookup(&[
            (ENV_GITHUB_TOKEN, "gh"),
            (ENV_HMAC_KEY, "key"),
        ]))
        .unwrap();

        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(settings.github.api_url, DEFAULT_GITHUB_API_URL);
        assert_eq!(settings.github.graphql_url, DEFAULT_GITHUB_GRAPHQL_URL);
        assert_eq!(settings.github.auth, GitHubAuth::Token(String::from("gh")));
        assert_eq!(settings.hmac_key, "key");
    }

    #[test]
    fn test_overrides() {
        let settings = SettingsLoader::from_lookup(lookup(&[
            (ENV_GITHUB_TOKEN, "gh"),
            (ENV_HMAC_KEY, "key"),
            (ENV_PORT, "9090"),
            (ENV_TIMEOUT_SECS, "3"),
            (ENV_GITHUB_API_URL, "https://ghe.example.com/api/v3"),
            (ENV_GITHUB_GRAPHQL_URL, "https://ghe.example.com/api/graphql"),
        ]))
        .unwrap();

        assert_eq!(settings.port, 9090);
        assert_eq!(settings.request_timeout, Duration::from_secs(3));
        assert_eq!(settings.github.api_url, "https://ghe.example.com/api/v3");
    }

    #[test]
    fn test_missing_github_auth() {
        let err = SettingsLoader::from_lookup(lookup(&[(ENV_HMAC_KEY, "key")])).unwrap_err();
        assert!(matches!(err, RunTaskError::Config(ConfigError::MissingGitHubAuth { .. })));

        let err = SettingsLoader::from_lookup(lookup(&[(ENV_GITHUB_TOKEN, "  "), (ENV_HMAC_KEY, "k")]))
            .unwrap_err();
        assert!(matches!(err, RunTaskError::Config(ConfigError::MissingGitHubAuth { .. })));

        // An incomplete App configuration is not enough.
        let err = SettingsLoader::from_lookup(lookup(&[
            (ENV_HMAC_KEY, "key"),
            (ENV_GITHUB_APP_ID, "123"),
            (ENV_GITHUB_APP_PRIVATE_KEY, "a2V5"),
        ]))
        .unwrap_err();
        assert!(matches!(err, RunTaskError::Config(ConfigError::MissingGitHubAuth { .. })));
    }

    #[test]
    fn test_missing_hmac_key() {
        let err = SettingsLoader::from_lookup(lookup(&[(ENV_GITHUB_TOKEN, "gh")])).unwrap_err();
        assert!(matches!(
            err,
            RunTaskError::Config(ConfigError::MissingEnvVar { ref name }) if name == ENV_HMAC_KEY
        ));
    }

    #[test]
    fn test_github_app_auth() {
        let settings = SettingsLoader::from_lookup(lookup(&[
            (ENV_HMAC_KEY, "key"),
            (ENV_GITHUB_APP_ID, "123"),
            (ENV_GITHUB_APP_PRIVATE_KEY, "LS0tLS1CRUdJTg=="),
            (ENV_GITHUB_APP_INSTALLATION_ID, " 456 "),
        ]))
        .unwrap();

        assert_eq!(
            settings.github.auth,
            GitHubAuth::App {
                app_id: 123,
                installation_id: 456,
                private_key: b"-----BEGIN".to_vec(),
            }
        );
        assert!(!format!("{settings:?}").contains("BEGIN"));
    }

    #[test]
    fn test_token_takes_precedence_over_app() {
        let settings = SettingsLoader::from_lookup(lookup(&[
            (ENV_HMAC_KEY, "key"),
            (ENV_GITHUB_TOKEN, "gh"),
            (ENV_GITHUB_APP_ID, "123"),
            (ENV_GITHUB_APP_PRIVATE_KEY, "a2V5"),
            (ENV_GITHUB_APP_INSTALLATION_ID, "456"),
        ]))
        .unwrap();

        assert_eq!(settings.github.auth, GitHubAuth::Token(String::from("gh")));
    }

    #[test]
    fn test_invalid_github_app_values() {
        for (name, value) in [
            (ENV_GITHUB_APP_ID, "app"),
            (ENV_GITHUB_APP_INSTALLATION_ID, "-4"),
            (ENV_GITHUB_APP_PRIVATE_KEY, "not base64!"),
        ] {
            let mut vars = vec![
                (ENV_HMAC_KEY, "key"),
                (ENV_GITHUB_APP_ID, "123"),
                (ENV_GITHUB_APP_PRIVATE_KEY, "a2V5"),
                (ENV_GITHUB_APP_INSTALLATION_ID, "456"),
            ];
            vars.retain(|(k, _)| *k != name);
            vars.push((name, value));

            let err = SettingsLoader::from_lookup(lookup(&vars)).unwrap_err();
            assert!(
                matches!(err, RunTaskError::Config(ConfigError::InvalidValue { name: ref n, .. }) if n == name),
                "{name}={value}"
            );
        }
    }

    #[test]
    fn test_invalid_values() {
        for (name, value) in [(ENV_PORT, "http"), (ENV_TIMEOUT_SECS, "-1"), (ENV_TIMEOUT_SECS, "0")] {
            let err = SettingsLoader::from_lookup(lookup(&[
                (ENV_GITHUB_TOKEN, "gh"),
                (ENV_HMAC_KEY, "key"),
                (name, value),
            ]))
            .unwrap_err();
            assert!(
                matches!(err, RunTaskError::Config(ConfigError::InvalidValue { .. })),
                "{name}={value}"
            );
        }
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let settings = SettingsLoader::from_lookup(lookup(&[
            (ENV_GITHUB_TOKEN, "ghp_secret"),
            (ENV_HMAC_KEY, "hmac_secret"),
        ]))
        .unwrap();

        let debug = format!("{settings:?}");
        assert!(!debug.contains("ghp_secret"));
        assert!(!debug.contains("hmac_secret"));
    }

    #[test]
    fn test_load_dotenv_missing_file_is_ok() {
        let loader = SettingsLoader::new().with_env_file("/nonexistent/dir/.env");
        assert!(loader.load_dotenv().is_ok());
        assert_eq!(loader.env_file(), Some(Path::new("/nonexistent/dir/.env")));
    }

    #[test]
    fn test_load_dotenv_invalid_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "BROKEN='unterminated").expect("Failed to write");

        let loader = SettingsLoader::new().with_env_file(file.path());
        assert!(loader.load_dotenv().is_err());
    }
}
