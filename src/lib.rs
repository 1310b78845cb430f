// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Run Task PR Comment
//!
//! A Terraform Cloud/Enterprise run task that posts plan reports on the
//! pull request that triggered the run.
//!
//! ## Overview
//!
//! For every post-plan run task request the service:
//!
//! - Fetches the JSON plan of the run
//! - Renders a size-bounded markdown report with sensitive values masked
//! - Posts the report as a new pull request comment
//! - Minimizes the report it replaces as outdated
//! - Reports the task result back to the platform
//!
//! ## Architecture
//!
//! The report is rebuilt from scratch on every run:
//!
//! 1. **Plan**: Actions are classified, values masked, changes tallied
//! 2. **Report**: The body is assembled under the comment size limit
//! 3. **Lifecycle**: The latest report is located, then superseded
//!
//! ## Modules
//!
//! - [`config`]: Settings from the environment
//! - [`plan`]: Plan document, action classifier, masking and diffing
//! - [`report`]: Report body rendering
//! - [`comment`]: Pull request comment lifecycle
//! - [`github`]: GitHub REST and GraphQL client
//! - [`tfe`]: Terraform Cloud/Enterprise run task protocol
//! - [`runtask`]: Invocation processing
//! - [`server`]: Webhook server
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```text
//! <!-- runtasks-pr-comment -->
//! ### Terraform Cloud/Enterprise Plan Output
//! ...
//! & 1 to import, + 2 to add, ~ 0 to change, - 1 to destroy.
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod comment;
pub mod config;
pub mod error;
pub mod github;
pub mod plan;
pub mod report;
pub mod runtask;
pub mod server;
pub mod tfe;

#[cfg(test)]
mod testing;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, LogFormat};
pub use comment::{CommentLifecycle, PriorReport, PullRequestRef, ReviewThread};
pub use config::{Settings, SettingsLoader};
pub use error::{Result, RunTaskError};
pub use github::GitHubClient;
pub use plan::{Action, ChangeSummary, Plan, mask_sensitive, structural_diff};
pub use report::{RenderedComment, ReportRenderer};
pub use runtask::{RunTaskOutcome, RunTaskProcessor};
pub use server::ServerState;
pub use tfe::{RunTaskPlatform, RunTaskRequest, TfeClient};
