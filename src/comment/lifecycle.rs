//! Comment lifecycle coordination.
//!
//! Every run posts a fresh report and then minimizes the previous one, so
//! the thread keeps an append-only trail with a single expanded report.
//! Concurrent runs on the same pull request are not coordinated; a later
//! run minimizes whatever stragglers an earlier race left behind.

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::report::COMMENT_MARKER;

use super::thread::{COMMENT_HISTORY_LIMIT, MinimizeClassifier, ReviewThread, ThreadComment};
use super::url::PullRequestRef;

/// State of the previous report on a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriorReport {
    /// No report has been posted yet.
    None,
    /// A previous report is still expanded.
    Active(ThreadComment),
    /// The previous report is already minimized.
    Minimized(ThreadComment),
}

impl PriorReport {
    /// Classifies the result of a lookup.
    #[must_use]
    pub fn from_latest(latest: Option<ThreadComment>) -> Self {
        match latest {
            None => Self::None,
            Some(comment) if comment.is_minimized => Self::Minimized(comment),
            Some(comment) => Self::Active(comment),
        }
    }
}

/// Returns the most recent comment whose body starts with the marker tag.
///
/// `comments` must be in chronological order. Minimized state is ignored.
#[must_use]
pub fn find_latest_report(comments: &[ThreadComment]) -> Option<&ThreadComment> {
    comments
        .iter()
        .rev()
        .find(|c| c.body.starts_with(COMMENT_MARKER))
}

/// Locates, posts, and supersedes reports on a pull request thread.
#[derive(Debug)]
pub struct CommentLifecycle<'a, T: ReviewThread> {
    /// Thread API.
    thread: &'a T,
}

impl<'a, T: ReviewThread> CommentLifecycle<'a, T> {
    /// Creates a coordinator over a thread API.
    #[must_use]
    pub const fn new(thread: &'a T) -> Self {
        Self { thread }
    }

    /// Looks up the previous report on the pull request.
    ///
    /// Finding nothing is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the comment history cannot be fetched.
    pub async fn find_latest(&self, pr: &PullRequestRef) -> Result<PriorReport> {
        let comments = self
            .thread
            .recent_comments(pr, COMMENT_HISTORY_LIMIT)
            .await?;
        debug!("Fetched {} comments from {pr}", comments.len());

        let prior = PriorReport::from_latest(find_latest_report(&comments).cloned());
        match &prior {
            PriorReport::None => debug!("No previous report on {pr}"),
            PriorReport::Active(c) => debug!("Previous report {} is active", c.id),
            PriorReport::Minimized(c) => debug!("Previous report {} is already minimized", c.id),
        }
        Ok(prior)
    }

    /// Posts a new report and minimizes the previous one.
    ///
    /// The new body is always posted as a new comment. Minimizing the
    /// previous report is best effort: failures are logged and swallowed.
    ///
    /// # Errors
    ///
    /// Returns an error only if posting the new comment fails.
    pub async fn publish(&self, pr: &PullRequestRef, body: &str, prior: &PriorReport) -> Result<()> {
        self.thread.create_comment(pr, body).await?;
        info!("Posted plan report on {pr}");

        self.supersede(prior).await;
        Ok(())
    }

    /// Minimizes the previous report if it is still active.
    pub async fn supersede(&self, prior: &PriorReport) {
        let PriorReport::Active(comment) = prior else {
            return;
        };

        let classifier = MinimizeClassifier::Outdated;
        match self.thread.minimize_comment(&comment.id, classifier).await {
            Ok(()) => info!("Minimized previous report {} as {classifier}", comment.id),
            Err(e) => warn!("Failed to minimize comment {}: {e}", comment.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::url::VcsHost;
    use crate::testing::{FakeThread, report_comment as report};

    fn pr() -> PullRequestRef {
        PullRequestRef {
            host: VcsHost::GitHub,
            owner: String::from("org"),
            repository: String::from("repo"),
            number: 1,
        }
    }

    fn comment(id: &str, body: &str, is_minimized: bool) -> ThreadComment {
        ThreadComment {
            id: id.to_string(),
            author: Some(String::from("bot")),
            body: body.to_string(),
            is_minimized,
        }
    }

    #[test]
    fn test_find_latest_returns_most_recent_report() {
        let comments = vec![
            report("c1", false),
            report("c2", true),
            report("c3", false),
            comment("c4", "LGTM", false),
        ];

        assert_eq!(find_latest_report(&comments).map(|c| c.id.as_str()), Some("c3"));
    }

    #[test]
    fn test_find_latest_ignores_minimized_state() {
        let comments = vec![report("c1", false), report("c2", false), report("c3", true)];

        assert_eq!(find_latest_report(&comments).map(|c| c.id.as_str()), Some("c3"));
    }

    #[test]
    fn test_find_latest_requires_prefix() {
        let comments = vec![
            comment("c1", &format!("quoted: {COMMENT_MARKER}"), false),
            comment("c2", "plain", false),
        ];

        assert!(find_latest_report(&comments).is_none());
        assert!(find_latest_report(&[]).is_none());
    }

    #[tokio::test]
    async fn test_find_latest_classifies_prior_state() {
        let thread = FakeThread {
            comments: vec![report("c1", false), report("c2", true)],
            ..FakeThread::default()
        };
        let lifecycle = CommentLifecycle::new(&thread);

        let prior = lifecycle.find_latest(&pr()).await.unwrap();
        assert_eq!(prior, PriorReport::Minimized(report("c2", true)));

        let empty = FakeThread::default();
        let prior = CommentLifecycle::new(&empty).find_latest(&pr()).await.unwrap();
        assert_eq!(prior, PriorReport::None);
    }

    #[tokio::test]
    async fn test_publish_creates_then_minimizes_active_prior() {
        let thread = FakeThread::default();
        let lifecycle = CommentLifecycle::new(&thread);

        lifecycle
            .publish(&pr(), "new body", &PriorReport::Active(report("old", false)))
            .await
            .unwrap();

        assert_eq!(*thread.created.lock().unwrap(), vec![String::from("new body")]);
        assert_eq!(
            *thread.minimized.lock().unwrap(),
            vec![(String::from("old"), MinimizeClassifier::Outdated)]
        );
    }

    #[tokio::test]
    async fn test_publish_skips_minimized_and_missing_prior() {
        let thread = FakeThread::default();
        let lifecycle = CommentLifecycle::new(&thread);

        lifecycle
            .publish(&pr(), "a", &PriorReport::Minimized(report("old", true)))
            .await
            .unwrap();
        lifecycle.publish(&pr(), "b", &PriorReport::None).await.unwrap();

        assert_eq!(thread.created.lock().unwrap().len(), 2);
        assert!(thread.minimized.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_minimize_failure_is_swallowed() {
        let thread = FakeThread {
            fail_minimize: true,
            ..FakeThread::default()
        };
        let lifecycle = CommentLifecycle::new(&thread);

        let result = lifecycle
            .publish(&pr(), "body", &PriorReport::Active(report("old", false)))
            .await;

        assert!(result.is_ok());
        assert_eq!(thread.created.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_failure_skips_minimize() {
        let thread = FakeThread {
            fail_create: true,
            ..FakeThread::default()
        };
        let lifecycle = CommentLifecycle::new(&thread);

        let result = lifecycle
            .publish(&pr(), "body", &PriorReport::Active(report("old", false)))
            .await;

        assert!(result.is_err());
        assert!(thread.minimized.lock().unwrap().is_empty());
    }
}
