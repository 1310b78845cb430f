//! Report body assembly.
//!
//! Renders a plan into the markdown body of a pull request comment. The
//! body always starts with [`COMMENT_MARKER`] so later invocations can find
//! it again among the thread's comments.

use std::fmt::Write;

use tracing::{debug, warn};

use crate::error::Result;
use crate::plan::{Action, Change, ChangeSummary, Plan, mask_sensitive, structural_diff};

/// Prefix identifying reports posted by this service.
pub const COMMENT_MARKER: &str = "<!-- runtasks-pr-comment -->";

/// Maximum number of characters of diff text kept in one comment.
///
/// GitHub rejects comment bodies above 65536 characters; the rest of the
/// body gets 1000 characters of headroom.
pub const MAX_DIFF_CHARS: usize = 65536 - 1000;

const TASKS_BADGE: &str = "[![RUN_TASKS](https://img.shields.io/static/v1?label=TFE&message=Run_Tasks&color=success&style=flat)](https://developer.hashicorp.com/terraform/cloud-docs/workspaces/settings/run-tasks)";
const TITLE: &str = "### Terraform Cloud/Enterprise Plan Output";
const NO_CHANGES: &str = "```\nNo changes. Your infrastructure matches the configuration.\n```";
const TOO_LONG: &str =
    "```\nThe results are too long, so please directly check them on TFC/E.\n```";

/// A rendered report body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedComment {
    /// Markdown body, starting with [`COMMENT_MARKER`].
    pub body: String,
    /// Tally of the changes, absent when the plan had nothing to show.
    pub summary: Option<ChangeSummary>,
}

/// Renders plans into report bodies for one run.
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    /// Link to the run in Terraform Cloud/Enterprise.
    run_url: String,
    /// Link to the commit that triggered the run.
    commit_url: String,
}

impl ReportRenderer {
    /// Creates a renderer for a run.
    #[must_use]
    pub fn new(run_url: impl Into<String>, commit_url: impl Into<String>) -> Self {
        Self {
            run_url: run_url.into(),
            commit_url: commit_url.into(),
        }
    }

    /// Renders the report body for a plan.
    ///
    /// # Errors
    ///
    /// Returns a contract violation if any change carries an action tuple
    /// outside the defined shapes.
    pub fn render(&self, plan: &Plan) -> Result<RenderedComment> {
        let mut body = self.header();

        if plan.resource_changes.is_empty() {
            body.push_str(NO_CHANGES);
            return Ok(RenderedComment { body, summary: None });
        }

        let mut summary = ChangeSummary::new();
        let mut resources = String::new();

        for resource in &plan.resource_changes {
            let Some(change) = &resource.change else {
                debug!("{} has no change detail, rendering no changes", resource.address);
                body.push_str(NO_CHANGES);
                return Ok(RenderedComment { body, summary: None });
            };

            if change.is_import() {
                summary.record_import();
                continue;
            }

            let action = Action::classify(&change.actions)?;
            if action == Action::NoOp {
                continue;
            }
            summary.record(action);

            let title = format!("{} {}", action.symbol(), resource.address);
            let detail = format!(
                "{} resource \"{}\" \"{}\" {}",
                action.symbol(),
                resource.resource_type,
                resource.name,
                masked_diff(change)
            );
            push_details(&mut resources, &title, &detail);
            resources.push_str("\n\n");
        }

        let (outputs, output_count) = render_outputs(plan)?;

        let size = resources.chars().count() + outputs.chars().count();
        let _ = write!(body, "```\n{summary}\n```\n\n");

        if size > MAX_DIFF_CHARS {
            warn!("Diff text is {size} characters (limit {MAX_DIFF_CHARS}), omitting details");
            body.push_str(TOO_LONG);
            return Ok(RenderedComment {
                body,
                summary: Some(summary),
            });
        }

        body.push_str(&resources);
        if output_count > 0 {
            let title = format!("Outputs {output_count} planned to change");
            push_details(&mut body, &title, &outputs);
        }

        Ok(RenderedComment {
            body,
            summary: Some(summary),
        })
    }

    /// Marker, badges, trigger line and title.
    fn header(&self) -> String {
        format!(
            "{COMMENT_MARKER}\n{TASKS_BADGE} [![RUNS](https://img.shields.io/static/v1?label=TFE&message=Run&style=flat)]({})\n\nThis run task was triggered by {}.\n\n{TITLE}\n",
            self.run_url, self.commit_url
        )
    }
}

/// Renders output changes in name order, returning the text and the count.
fn render_outputs(plan: &Plan) -> Result<(String, usize)> {
    let mut text = String::new();
    let mut count = 0;

    // BTreeMap iteration is already lexicographic by name.
    for (name, change) in &plan.output_changes {
        let action = Action::classify(&change.actions)?;
        if action == Action::NoOp {
            continue;
        }
        count += 1;
        let _ = writeln!(text, "{} {name}: {}", action.symbol(), masked_diff(change));
    }

    Ok((text, count))
}

fn masked_diff(change: &Change) -> String {
    let before = mask_sensitive(&change.before, &change.before_sensitivity());
    let after = mask_sensitive(&change.after, &change.after_sensitivity());
    structural_diff(&before, &after)
}

fn push_details(out: &mut String, summary: &str, detail: &str) {
    let _ = write!(
        out,
        "<details>\n<summary>{summary}</summary>\n\n```diff\n{detail}\n```\n</details>"
    );
}
