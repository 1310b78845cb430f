//! Run task platform interface.

use async_trait::async_trait;

use crate::error::Result;
use crate::plan::Plan;

use super::types::TaskResult;

/// Calls back into the platform that triggered the run task.
#[async_trait]
pub trait RunTaskPlatform: Send + Sync {
    /// Fetches and validates the plan of the run.
    async fn fetch_plan(&self, url: &str, token: &str) -> Result<Plan>;

    /// Reports the task result.
    async fn send_result(&self, callback_url: &str, token: &str, result: &TaskResult) -> Result<()>;
}
