//! GitHub request authentication.
//!
//! A static token is used as is. A GitHub App signs a short-lived RS256 JWT
//! and exchanges it for an installation access token, which is cached until
//! shortly before it expires.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::{ENV_GITHUB_APP_PRIVATE_KEY, GitHubAuth};
use crate::error::{ApiError, ConfigError, Result};

use super::client::SERVICE;

/// Seconds the JWT issue time is backdated to absorb clock drift.
const JWT_BACKDATE_SECS: i64 = 60;

/// Seconds the JWT stays valid after now; GitHub caps the total at ten minutes.
const JWT_LIFETIME_SECS: i64 = 540;

/// Installation tokens this close to expiry are refreshed.
const REFRESH_MARGIN_SECS: i64 = 60;

/// Source of the bearer token for GitHub requests.
#[derive(Clone)]
pub(super) enum TokenSource {
    /// Static OAuth or personal access token.
    Static(String),
    /// GitHub App installation.
    App(Arc<AppInstallation>),
}

/// GitHub App installation credentials and the cached access token.
pub(super) struct AppInstallation {
    app_id: u64,
    installation_id: u64,
    key: EncodingKey,
    cached: Mutex<Option<InstallationToken>>,
}

#[derive(Debug, Clone, Deserialize)]
struct InstallationToken {
    token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AppClaims {
    iat: i64,
    exp: i64,
    iss: String,
}

impl TokenSource {
    /// Builds a token source from the configured authentication.
    ///
    /// # Errors
    ///
    /// Returns an error if the App private key is not an RSA PEM key.
    pub(super) fn new(auth: &GitHubAuth) -> Result<Self> {
        match auth {
            GitHubAuth::Token(token) => Ok(Self::Static(token.clone())),
            GitHubAuth::App {
                app_id,
                installation_id,
                private_key,
            } => {
                let key = EncodingKey::from_rsa_pem(private_key).map_err(|e| {
                    ConfigError::invalid(
                        ENV_GITHUB_APP_PRIVATE_KEY,
                        format!("not an RSA private key: {e}"),
                    )
                })?;

                Ok(Self::App(Arc::new(AppInstallation {
                    app_id: *app_id,
                    installation_id: *installation_id,
                    key,
                    cached: Mutex::new(None),
                })))
            }
        }
    }

    /// Returns the token to send as `Authorization: Bearer`.
    ///
    /// # Errors
    ///
    /// Returns an error if an installation token cannot be obtained.
    pub(super) async fn bearer(&self, client: &Client, api_url: &str) -> Result<String> {
        match self {
            Self::Static(token) => Ok(token.clone()),
            Self::App(app) => app.installation_token(client, api_url).await,
        }
    }
}

impl AppInstallation {
    /// Signs the app JWT.
    fn jwt(&self, now: DateTime<Utc>) -> Result<String> {
        let claims = AppClaims {
            iat: now.timestamp() - JWT_BACKDATE_SECS,
            exp: now.timestamp() + JWT_LIFETIME_SECS,
            iss: self.app_id.to_string(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.key).map_err(|e| {
            ConfigError::invalid(ENV_GITHUB_APP_PRIVATE_KEY, format!("cannot sign JWT: {e}"))
                .into()
        })
    }

    /// Returns a cached installation token, requesting a new one when the
    /// cached token is missing or about to expire.
    async fn installation_token(&self, client: &Client, api_url: &str) -> Result<String> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();

        if let Some(token) = cached
            .as_ref()
            .filter(|t| t.expires_at.timestamp() - REFRESH_MARGIN_SECS > now.timestamp())
        {
            return Ok(token.token.clone());
        }

        debug!(
            "Requesting access token for installation {}",
            self.installation_id
        );
        let url = format!(
            "{api_url}/app/installations/{}/access_tokens",
            self.installation_id
        );

        let response = client
            .post(&url)
            .bearer_auth(self.jwt(now)?)
            .send()
            .await
            .map_err(|e| ApiError::network(SERVICE, format!("Token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::status(SERVICE, status.as_u16(), body).into());
        }

        let token: InstallationToken = response.json().await.map_err(|e| {
            ApiError::invalid_response(SERVICE, format!("Failed to parse access token: {e}"))
        })?;
        debug!("Installation token valid until {}", token.expires_at);

        let value = token.token.clone();
        *cached = Some(token);
        Ok(value)
    }
}

// Credentials stay out of logs.
impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static(_) => f.debug_tuple("Static").field(&"<redacted>").finish(),
            Self::App(app) => f
                .debug_struct("App")
                .field("app_id", &app.app_id)
                .field("installation_id", &app.installation_id)
                .finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use crate::error::RunTaskError;

    const APP_KEY: &[u8] = include_bytes!("testdata/app_key.pem");

    fn app_auth() -> GitHubAuth {
        GitHubAuth::App {
            app_id: 123,
            installation_id: 456,
            private_key: APP_KEY.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_static_token() {
        let source = TokenSource::new(&GitHubAuth::Token(String::from("gh-token"))).unwrap();

        let token = source
            .bearer(&Client::new(), "http://127.0.0.1:9")
            .await
            .unwrap();
        assert_eq!(token, "gh-token");
        assert!(!format!("{source:?}").contains("gh-token"));
    }

    #[test]
    fn test_invalid_private_key() {
        let auth = GitHubAuth::App {
            app_id: 1,
            installation_id: 2,
            private_key: b"not a key".to_vec(),
        };

        let err = TokenSource::new(&auth).unwrap_err();
        assert!(matches!(
            err,
            RunTaskError::Config(ConfigError::InvalidValue { ref name, .. }) if name == ENV_GITHUB_APP_PRIVATE_KEY
        ));
    }

    #[test]
    fn test_app_jwt_claims() {
        let TokenSource::App(app) = TokenSource::new(&app_auth()).unwrap() else {
            panic!("expected app credentials");
        };
        let now = Utc::now();

        let jwt = app.jwt(now).unwrap();

        let header = jsonwebtoken::decode_header(&jwt).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);

        let payload = jwt.split('.').nth(1).unwrap();
        let claims: AppClaims =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();
        assert_eq!(claims.iss, "123");
        assert_eq!(claims.iat, now.timestamp() - JWT_BACKDATE_SECS);
        assert_eq!(claims.exp - claims.iat, JWT_BACKDATE_SECS + JWT_LIFETIME_SECS);
        assert!(claims.exp - claims.iat <= 600);
    }
}
