//! Run task payload types.
//!
//! See the run task integration details in the Terraform Cloud
//! documentation for the full field list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access token the platform sends when verifying a new run task.
pub const VERIFICATION_TOKEN: &str = "test-token";

/// Inbound run task request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunTaskRequest {
    /// Payload schema version.
    pub payload_version: u32,
    /// Run stage (`pre_plan`, `post_plan`, ...).
    pub stage: String,
    /// Token for the plan and callback endpoints.
    pub access_token: String,
    /// Platform capabilities.
    pub capabilities: Option<Capabilities>,
    /// Configuration version download URL.
    pub configuration_version_download_url: String,
    /// Configuration version ID.
    pub configuration_version_id: String,
    /// Whether the run is speculative.
    pub is_speculative: bool,
    /// Organization name. The platform's key is misspelled; kept as is.
    #[serde(rename = "organization_nam", alias = "organization_name")]
    pub organization_name: String,
    /// URL of the JSON plan.
    pub plan_json_api_url: String,
    /// Link to the run in the web UI.
    pub run_app_url: String,
    /// When the run was created.
    pub run_created_at: Option<DateTime<Utc>>,
    /// Who created the run.
    pub run_created_by: String,
    /// Run ID.
    pub run_id: String,
    /// Run message.
    pub run_message: String,
    /// Where the task result is reported.
    pub task_result_callback_url: String,
    /// Enforcement level of the task.
    pub task_result_enforcement_level: String,
    /// Task result ID.
    pub task_result_id: String,
    /// Branch the run was triggered from.
    pub vcs_branch: String,
    /// Commit that triggered the run.
    pub vcs_commit_url: String,
    /// Pull request that triggered the run, empty for non-PR runs.
    pub vcs_pull_request_url: String,
    /// Repository URL.
    pub vcs_repo_url: String,
    /// Link to the workspace in the web UI.
    pub workspace_app_url: String,
    /// Workspace ID.
    pub workspace_id: String,
    /// Workspace name.
    pub workspace_name: String,
    /// Workspace working directory.
    pub workspace_working_directory: String,
}

/// Platform capabilities advertised in a request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// Whether detailed outcomes are supported.
    pub outcomes: bool,
}

impl RunTaskRequest {
    /// Returns true for the platform's verification request.
    #[must_use]
    pub fn is_verification(&self) -> bool {
        self.access_token == VERIFICATION_TOKEN
    }

    /// Returns true if the run was triggered by a pull request.
    #[must_use]
    pub fn has_pull_request(&self) -> bool {
        !self.vcs_pull_request_url.is_empty()
    }
}

/// Status reported back to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// The task passed.
    Passed,
}

/// Outbound task result document.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResult {
    /// Result payload.
    pub data: TaskResultData,
}

/// Task result payload.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResultData {
    /// Always `task-results`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Result attributes.
    pub attributes: TaskResultAttributes,
}

/// Task result attributes.
#[derive(Debug, Clone, Serialize)]
pub struct TaskResultAttributes {
    /// Outcome of the task.
    pub status: TaskStatus,
    /// Message shown in the run.
    pub message: String,
    /// Optional link with more details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl TaskResult {
    /// Creates a task result document.
    #[must_use]
    pub fn new(status: TaskStatus, message: impl Into<String>) -> Self {
        Self {
            data: TaskResultData {
                kind: "task-results",
                attributes: TaskResultAttributes {
                    status,
                    message: message.into(),
                    url: None,
                },
            },
        }
    }

    /// Creates a passed result.
    #[must_use]
    pub fn passed(message: impl Into<String>) -> Self {
        Self::new(TaskStatus::Passed, message)
    }
}
