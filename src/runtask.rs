//! Run task processing.
//!
//! This module drives one invocation end to end: fetch the plan, render
//! the report, post it on the pull request, supersede the previous report
//! and report the outcome back to the platform.

use std::fmt;

use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use crate::comment::{CommentLifecycle, PullRequestRef, ReviewThread};
use crate::error::Result;
use crate::report::ReportRenderer;
use crate::tfe::{RunTaskPlatform, RunTaskRequest, TaskResult};

/// Message reported for runs without a pull request.
pub const SKIPPED_MESSAGE: &str = "Skipped pushing the plan result to VCS";

/// Message reported after the report was posted.
pub const SUCCEEDED_MESSAGE: &str = "Succeeded pushing the plan result to VCS";

/// How an invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunTaskOutcome {
    /// The platform's verification request was acknowledged.
    Verified,
    /// The run has no pull request; nothing was posted.
    Skipped,
    /// A report was posted on the pull request.
    Posted {
        /// Pull request the report was posted on.
        pull_request: PullRequestRef,
    },
}

impl fmt::Display for RunTaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verified => write!(f, "verified"),
            Self::Skipped => write!(f, "skipped"),
            Self::Posted { pull_request } => write!(f, "posted on {pull_request}"),
        }
    }
}

/// Processes run task requests against a platform and a review thread.
pub struct RunTaskProcessor<P: RunTaskPlatform, T: ReviewThread> {
    /// Run task platform.
    platform: P,
    /// Pull request comment API.
    thread: T,
}

impl<P: RunTaskPlatform, T: ReviewThread> RunTaskProcessor<P, T> {
    /// Creates a new processor.
    #[must_use]
    pub const fn new(platform: P, thread: T) -> Self {
        Self { platform, thread }
    }

    /// Returns the run task platform.
    #[must_use]
    pub const fn platform(&self) -> &P {
        &self.platform
    }

    /// Returns the review thread API.
    #[must_use]
    pub const fn thread(&self) -> &T {
        &self.thread
    }

    /// Handles one run task request.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan cannot be fetched or rendered, the pull
    /// request URL is unsupported, the comment cannot be posted, or the
    /// result callback fails. Failing to minimize the previous report is
    /// not an error.
    pub async fn process(&self, request: &RunTaskRequest) -> Result<RunTaskOutcome> {
        let span = info_span!(
            "run_task",
            run_id = %request.run_id,
            invocation = %Uuid::new_v4(),
        );

        self.process_inner(request).instrument(span).await
    }

    async fn process_inner(&self, request: &RunTaskRequest) -> Result<RunTaskOutcome> {
        if request.is_verification() {
            info!("Acknowledged verification request");
            return Ok(RunTaskOutcome::Verified);
        }

        if !request.has_pull_request() {
            info!("Run has no pull request, skipping");
            self.report(request, SKIPPED_MESSAGE).await?;
            return Ok(RunTaskOutcome::Skipped);
        }

        let plan = self
            .platform
            .fetch_plan(&request.plan_json_api_url, &request.access_token)
            .await?;
        debug!("Fetched plan with {} resource changes", plan.resource_changes.len());

        let pull_request = PullRequestRef::parse(&request.vcs_pull_request_url)?;
        let lifecycle = CommentLifecycle::new(&self.thread);
        let prior = lifecycle.find_latest(&pull_request).await?;

        let rendered = ReportRenderer::new(&request.run_app_url, &request.vcs_commit_url)
            .render(&plan)?;
        if let Some(summary) = &rendered.summary {
            info!("{summary}");
        }

        lifecycle
            .publish(&pull_request, &rendered.body, &prior)
            .await?;

        self.report(request, SUCCEEDED_MESSAGE).await?;
        Ok(RunTaskOutcome::Posted { pull_request })
    }

    async fn report(&self, request: &RunTaskRequest, message: &str) -> Result<()> {
        self.platform
            .send_result(
                &request.task_result_callback_url,
                &request.access_token,
                &TaskResult::passed(message),
            )
            .await
    }
}
