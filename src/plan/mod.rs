//! Plan module.
//!
//! This module handles the plan document and everything derived from a
//! single change: action classification, sensitive value masking, change
//! tallying, and the before/after diff.

mod action;
mod diff;
mod sensitive;
mod summary;
mod types;

pub use action::Action;
pub use diff::structural_diff;
pub use sensitive::{MASKED_VALUE, Sensitivity, mask_sensitive};
pub use summary::ChangeSummary;
pub use types::{Change, Plan, ResourceChange};
