//! Pull request comment module.
//!
//! This module finds the previous report on a pull request, posts the new
//! one, and minimizes the one it replaces.

mod lifecycle;
mod thread;
mod url;

pub use lifecycle::{CommentLifecycle, PriorReport, find_latest_report};
pub use thread::{COMMENT_HISTORY_LIMIT, MinimizeClassifier, ReviewThread, ThreadComment};
pub use url::{GITHUB_HOST, PullRequestRef, VcsHost};
