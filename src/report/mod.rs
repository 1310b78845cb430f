//! Report rendering module.
//!
//! Turns a validated plan into the markdown body posted on the pull request.

mod renderer;

pub use renderer::{COMMENT_MARKER, MAX_DIFF_CHARS, RenderedComment, ReportRenderer};
