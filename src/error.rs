//! Error types for the run task service.
//!
//! This module provides the error hierarchy for every step of a run task
//! invocation: configuration, plan documents, pull request URLs, outbound
//! API calls, and inbound webhook requests.

use thiserror::Error;

/// The main error type for the run task service.
#[derive(Debug, Error)]
pub enum RunTaskError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Plan document errors.
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// Pull request URL errors.
    #[error("VCS error: {0}")]
    Vcs(#[from] VcsError),

    /// Outbound API errors (GitHub, Terraform Cloud).
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Inbound webhook request errors.
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// The plan broke the action contract. Unrecoverable.
    #[error("Contract violation: {0}")]
    Contract(#[from] ActionContractViolation),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable is missing or empty.
    #[error("Missing environment variable: {name}")]
    MissingEnvVar {
        /// Name of the missing variable.
        name: String,
    },

    /// Neither a GitHub token nor a complete GitHub App configuration is set.
    #[error("Missing an authentication config for GitHub: set {token} or {app_id}, {private_key} and {installation_id}")]
    MissingGitHubAuth {
        /// Token variable name.
        token: &'static str,
        /// App ID variable name.
        app_id: &'static str,
        /// Private key variable name.
        private_key: &'static str,
        /// Installation ID variable name.
        installation_id: &'static str,
    },

    /// A setting has an unusable value.
    #[error("Invalid value for {name}: {message}")]
    InvalidValue {
        /// Name of the setting.
        name: String,
        /// Description of the problem.
        message: String,
    },

    /// The `.env` file could not be loaded.
    #[error("Failed to load environment file {location}: {message}")]
    DotenvError {
        /// Description of the parse error.
        message: String,
        /// Path of the file.
        location: String,
    },
}

/// Plan document errors.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The document is not a recognized plan representation.
    #[error("Malformed plan document: {message}")]
    Malformed {
        /// Description of the problem.
        message: String,
    },

    /// The plan format version is outside the supported range.
    #[error("Unsupported plan format version: {version} (supported: >= 0.1, < 2.0)")]
    UnsupportedFormatVersion {
        /// The version found in the document.
        version: String,
    },
}

/// Pull request URL errors.
#[derive(Debug, Error)]
pub enum VcsError {
    /// The host has no pull request URL parser.
    #[error("Unsupported VCS host: {host}")]
    UnsupportedHost {
        /// The host found in the URL.
        host: String,
    },

    /// The URL does not have a recognized pull request shape.
    #[error("Unrecognized pull request URL {url}: {message}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Description of the problem.
        message: String,
    },
}

/// Outbound API errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("Network error communicating with {service}: {message}")]
    NetworkError {
        /// Remote service name.
        service: &'static str,
        /// Description of the network error.
        message: String,
    },

    /// The response status was not 2xx.
    #[error("{service} request failed: {status} - {message}")]
    UnexpectedStatus {
        /// Remote service name.
        service: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body or summary.
        message: String,
    },

    /// The response body could not be interpreted.
    #[error("Invalid response from {service}: {message}")]
    InvalidResponse {
        /// Remote service name.
        service: &'static str,
        /// Description of the response issue.
        message: String,
    },

    /// The GraphQL endpoint reported errors.
    #[error("GraphQL errors: {message}")]
    GraphQl {
        /// Joined error messages.
        message: String,
    },

    /// The minimize mutation returned without minimizing the comment.
    #[error("Cannot minimize comment. id: {id}, classifier: {classifier}")]
    NotMinimized {
        /// Node id of the comment.
        id: String,
        /// Classifier that was requested.
        classifier: String,
    },
}

/// Inbound webhook request errors.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The signature header is absent or does not match the body.
    #[error("Invalid X-TFC-Task-Signature value. Please check your HMAC key")]
    InvalidSignature,

    /// The body is not a run task payload.
    #[error("Invalid run task payload: {message}")]
    InvalidPayload {
        /// Description of the problem.
        message: String,
    },
}

/// An action tuple outside the shapes the plan format defines.
///
/// Upstream guarantees one of the defined shapes, so this is a broken
/// contract rather than a user-facing failure. It is never retried or
/// rendered around.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized action tuple: {actions:?}")]
pub struct ActionContractViolation {
    /// The keywords that were received.
    pub actions: Vec<String>,
}

/// Result type alias for run task operations.
pub type Result<T> = std::result::Result<T, RunTaskError>;

impl RunTaskError {
    /// Returns true if this error is an action contract violation.
    #[must_use]
    pub const fn is_contract_violation(&self) -> bool {
        matches!(self, Self::Contract(_))
    }
}

impl ConfigError {
    /// Creates an invalid value error for a named setting.
    #[must_use]
    pub fn invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl PlanError {
    /// Creates a malformed document error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

impl VcsError {
    /// Creates an invalid URL error.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: message.into(),
        }
    }
}

impl ApiError {
    /// Creates a network error.
    #[must_use]
    pub fn network(service: &'static str, message: impl Into<String>) -> Self {
        Self::NetworkError {
            service,
            message: message.into(),
        }
    }

    /// Creates an unexpected status error.
    #[must_use]
    pub fn status(service: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            service,
            status,
            message: message.into(),
        }
    }

    /// Creates an invalid response error.
    #[must_use]
    pub fn invalid_response(service: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            service,
            message: message.into(),
        }
    }
}
