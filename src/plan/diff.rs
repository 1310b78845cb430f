//! Structural diff between two value trees.
//!
//! Both trees are pretty-printed as JSON with sorted object keys and
//! compared line by line.

use serde_json::Value;
use similar::{ChangeTag, TextDiff};

/// Renders a human-readable delta between `before` and `after`.
///
/// Unchanged lines are prefixed with two spaces, removed lines with `- `
/// and added lines with `+ `. Equal trees produce an empty string.
#[must_use]
pub fn structural_diff(before: &Value, after: &Value) -> String {
    if before == after {
        return String::new();
    }

    let old = pretty(before);
    let new = pretty(after);
    let diff = TextDiff::from_lines(&old, &new);

    let mut output = String::new();
    for change in diff.iter_all_changes() {
        let prefix = match change.tag() {
            ChangeTag::Equal => "  ",
            ChangeTag::Delete => "- ",
            ChangeTag::Insert => "+ ",
        };
        output.push_str(prefix);
        output.push_str(change.value().trim_end_matches('\n'));
        output.push('\n');
    }
    output
}

fn pretty(value: &Value) -> String {
    let mut text = serde_json::to_string_pretty(value).unwrap_or_default();
    text.push('\n');
    text
}
