//! Terraform Cloud/Enterprise integration module.
//!
//! This module provides the run task payload types and the client used to
//! fetch plans and report task results.

mod client;
mod platform;
mod types;

pub use client::TfeClient;
pub use platform::RunTaskPlatform;
pub use types::{
    Capabilities, RunTaskRequest, TaskResult, TaskResultAttributes, TaskResultData, TaskStatus,
    VERIFICATION_TOKEN,
};
