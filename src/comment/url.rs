//! Pull request URL parsing.
//!
//! Each supported VCS host gets one variant of [`VcsHost`] with its own
//! path parser. Any other host is rejected.

use reqwest::Url;

use crate::error::{Result, VcsError};

/// Host name of GitHub.
pub const GITHUB_HOST: &str = "github.com";

/// Supported VCS hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VcsHost {
    /// github.com
    GitHub,
}

/// A pull request on a supported host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    /// Host the pull request lives on.
    pub host: VcsHost,
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repository: String,
    /// Pull request number.
    pub number: u64,
}

impl VcsHost {
    /// Looks up the host variant for a host name.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError::UnsupportedHost`] for unknown hosts.
    pub fn from_host(host: &str) -> std::result::Result<Self, VcsError> {
        match host {
            GITHUB_HOST => Ok(Self::GitHub),
            other => Err(VcsError::UnsupportedHost {
                host: other.to_string(),
            }),
        }
    }

    /// Returns the host name.
    #[must_use]
    pub const fn host_name(self) -> &'static str {
        match self {
            Self::GitHub => GITHUB_HOST,
        }
    }

    /// Parses a pull request path for this host.
    fn parse_path(self, url: &Url) -> std::result::Result<PullRequestRef, VcsError> {
        match self {
            Self::GitHub => parse_github_path(url),
        }
    }
}

impl PullRequestRef {
    /// Parses a web pull request URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is unparsable, the host is unsupported,
    /// or the path is not `/{owner}/{repo}/pull/{number}[...]`.
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw).map_err(|e| VcsError::invalid_url(raw, e.to_string()))?;
        let host = url
            .host_str()
            .ok_or_else(|| VcsError::invalid_url(raw, "missing host"))?;

        let pull_request = VcsHost::from_host(host)?.parse_path(&url)?;
        Ok(pull_request)
    }
}

impl std::fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}#{}",
            self.host.host_name(),
            self.owner,
            self.repository,
            self.number
        )
    }
}

fn parse_github_path(url: &Url) -> std::result::Result<PullRequestRef, VcsError> {
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        [owner, repository, "pull", number, ..] => {
            let number = number.parse::<u64>().map_err(|_| {
                VcsError::invalid_url(url.as_str(), format!("invalid pull request number {number:?}"))
            })?;
            Ok(PullRequestRef {
                host: VcsHost::GitHub,
                owner: (*owner).to_string(),
                repository: (*repository).to_string(),
                number,
            })
        }
        _ => Err(VcsError::invalid_url(
            url.as_str(),
            "expected /{owner}/{repo}/pull/{number}",
        )),
    }
}
