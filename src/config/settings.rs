//! Service settings.

use std::time::Duration;

/// Default webhook listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default GitHub REST API base URL.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Default GitHub GraphQL endpoint.
pub const DEFAULT_GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Default timeout for every outbound request, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Immutable settings, read once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// Webhook listen port.
    pub port: u16,
    /// Key for verifying `X-TFC-Task-Signature`.
    pub hmac_key: String,
    /// Timeout applied to every outbound request.
    pub request_timeout: Duration,
    /// GitHub access settings.
    pub github: GitHubSettings,
}

/// GitHub access settings.
#[derive(Clone, PartialEq, Eq)]
pub struct GitHubSettings {
    /// How requests are authenticated.
    pub auth: GitHubAuth,
    /// REST API base URL.
    pub api_url: String,
    /// GraphQL endpoint.
    pub graphql_url: String,
}

/// GitHub authentication mode.
#[derive(Clone, PartialEq, Eq)]
pub enum GitHubAuth {
    /// Static OAuth or personal access token.
    Token(String),
    /// GitHub App installation.
    App {
        /// App ID, used as the JWT issuer.
        app_id: u64,
        /// Installation the access tokens are issued for.
        installation_id: u64,
        /// PEM-encoded RSA private key of the app.
        private_key: Vec<u8>,
    },
}

// Secrets stay out of logs.
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("port", &self.port)
            .field("hmac_key", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("github", &self.github)
            .finish()
    }
}

impl std::fmt::Debug for GitHubSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubSettings")
            .field("auth", &self.auth)
            .field("api_url", &self.api_url)
            .field("graphql_url", &self.graphql_url)
            .finish()
    }
}

impl std::fmt::Debug for GitHubAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(_) => f.debug_tuple("Token").field(&"<redacted>").finish(),
            Self::App {
                app_id,
                installation_id,
                ..
            } => f
                .debug_struct("App")
                .field("app_id", app_id)
                .field("installation_id", installation_id)
                .field("private_key", &"<redacted>")
                .finish(),
        }
    }
}
