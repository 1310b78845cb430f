//! In-memory fakes of the external services, shared by unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::comment::{MinimizeClassifier, PullRequestRef, ReviewThread, ThreadComment};
use crate::error::{ApiError, Result, RunTaskError};
use crate::plan::Plan;
use crate::report::COMMENT_MARKER;
use crate::tfe::{RunTaskPlatform, TaskResult};

/// Review thread backed by a fixed comment list.
#[derive(Default)]
pub struct FakeThread {
    pub comments: Vec<ThreadComment>,
    pub fail_list: bool,
    pub fail_create: bool,
    pub fail_minimize: bool,
    pub created: Mutex<Vec<String>>,
    pub minimized: Mutex<Vec<(String, MinimizeClassifier)>>,
}

#[async_trait]
impl ReviewThread for FakeThread {
    async fn recent_comments(&self, _pr: &PullRequestRef, limit: u8) -> Result<Vec<ThreadComment>> {
        if self.fail_list {
            return Err(ApiError::network("GitHub", "connection refused").into());
        }
        Ok(self
            .comments
            .iter()
            .rev()
            .take(usize::from(limit))
            .rev()
            .cloned()
            .collect())
    }

    async fn create_comment(&self, _pr: &PullRequestRef, body: &str) -> Result<()> {
        if self.fail_create {
            return Err(ApiError::status("GitHub", 500, "boom").into());
        }
        self.created
            .lock()
            .map_err(|_| ApiError::network("GitHub", "poisoned"))?
            .push(body.to_string());
        Ok(())
    }

    async fn minimize_comment(&self, id: &str, classifier: MinimizeClassifier) -> Result<()> {
        if self.fail_minimize {
            return Err(RunTaskError::Api(ApiError::NotMinimized {
                id: id.to_string(),
                classifier: classifier.to_string(),
            }));
        }
        self.minimized
            .lock()
            .map_err(|_| ApiError::network("GitHub", "poisoned"))?
            .push((id.to_string(), classifier));
        Ok(())
    }
}

/// Run task platform serving a fixed plan.
#[derive(Default)]
pub struct FakePlatform {
    /// Plan to serve; `None` makes every fetch fail.
    pub plan: Option<Plan>,
    pub fail_callback: bool,
    pub fetched: Mutex<Vec<String>>,
    pub results: Mutex<Vec<String>>,
}

#[async_trait]
impl RunTaskPlatform for FakePlatform {
    async fn fetch_plan(&self, url: &str, _token: &str) -> Result<Plan> {
        self.fetched
            .lock()
            .map_err(|_| ApiError::network("Terraform Cloud", "poisoned"))?
            .push(url.to_string());
        self.plan
            .clone()
            .ok_or_else(|| ApiError::status("Terraform Cloud", 404, "not found").into())
    }

    async fn send_result(&self, _callback_url: &str, _token: &str, result: &TaskResult) -> Result<()> {
        if self.fail_callback {
            return Err(ApiError::status("Terraform Cloud", 500, "boom").into());
        }
        self.results
            .lock()
            .map_err(|_| ApiError::network("Terraform Cloud", "poisoned"))?
            .push(result.data.attributes.message.clone());
        Ok(())
    }
}

/// A marker-tagged report comment.
pub fn report_comment(id: &str, is_minimized: bool) -> ThreadComment {
    ThreadComment {
        id: id.to_string(),
        author: Some(String::from("runtask-bot")),
        body: format!("{COMMENT_MARKER}\nreport {id}"),
        is_minimized,
    }
}

/// Hex HMAC-SHA512 of a body, as the platform signs requests.
pub fn sign(body: &[u8], key: &str) -> String {
    let mut mac = Hmac::<Sha512>::new_from_slice(key.as_bytes()).expect("hmac key");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}
