//! Review thread interface.
//!
//! The coordinator only needs three operations from the VCS host; this
//! trait is the seam between it and the concrete API client.

use async_trait::async_trait;

use crate::error::Result;

use super::url::PullRequestRef;

/// Maximum number of recent comments fetched per lookup.
pub const COMMENT_HISTORY_LIMIT: u8 = 100;

/// A comment on a pull request thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadComment {
    /// Node id used by the minimize mutation.
    pub id: String,
    /// Login of the comment author.
    pub author: Option<String>,
    /// Comment body.
    pub body: String,
    /// Whether the comment is already minimized.
    pub is_minimized: bool,
}

/// Reason recorded when minimizing a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinimizeClassifier {
    /// The comment has been superseded.
    Outdated,
}

impl MinimizeClassifier {
    /// Returns the API label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Outdated => "OUTDATED",
        }
    }
}

impl std::fmt::Display for MinimizeClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations on a pull request's comment thread.
#[async_trait]
pub trait ReviewThread: Send + Sync {
    /// Lists up to `limit` most recent comments, oldest first.
    async fn recent_comments(&self, pr: &PullRequestRef, limit: u8) -> Result<Vec<ThreadComment>>;

    /// Posts a new comment.
    async fn create_comment(&self, pr: &PullRequestRef, body: &str) -> Result<()>;

    /// Minimizes a comment.
    ///
    /// Implementations must fail unless the host confirms the comment is
    /// now minimized.
    async fn minimize_comment(&self, id: &str, classifier: MinimizeClassifier) -> Result<()>;
}
