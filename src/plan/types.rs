//! Plan document model.
//!
//! Mirrors the subset of the JSON plan representation that the report
//! needs: resource changes in plan order and output changes by name.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{PlanError, Result, RunTaskError};

use super::sensitive::Sensitivity;

/// Lowest supported plan format version (inclusive).
const MIN_FORMAT_VERSION: (u64, u64) = (0, 1);

/// First unsupported plan format major version.
const MAX_FORMAT_MAJOR: u64 = 2;

/// A parsed and validated plan.
#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    /// Version of the plan JSON format.
    #[serde(default)]
    pub format_version: String,
    /// Version of the tool that produced the plan.
    #[serde(default)]
    pub terraform_version: Option<String>,
    /// Resource changes in plan order.
    #[serde(default)]
    pub resource_changes: Vec<ResourceChange>,
    /// Output changes keyed by output name.
    #[serde(default)]
    pub output_changes: BTreeMap<String, Change>,
}

/// A proposed change to one resource instance.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceChange {
    /// Unique resource address (e.g. `aws_instance.web[0]`).
    pub address: String,
    /// Resource mode (`managed` or `data`).
    #[serde(default)]
    pub mode: Option<String>,
    /// Resource type.
    #[serde(rename = "type", default)]
    pub resource_type: String,
    /// Resource name.
    #[serde(default)]
    pub name: String,
    /// Provider that manages the resource.
    #[serde(default)]
    pub provider_name: Option<String>,
    /// Change detail. Absent when the planner omitted it.
    #[serde(default)]
    pub change: Option<Change>,
}

/// Before/after states of a resource or output.
#[derive(Debug, Clone, Deserialize)]
pub struct Change {
    /// Action keywords (one or two).
    #[serde(default)]
    pub actions: Vec<String>,
    /// Value before the change.
    #[serde(default)]
    pub before: Value,
    /// Value after the change.
    #[serde(default)]
    pub after: Value,
    /// Sensitivity markers for `before`.
    #[serde(default)]
    pub before_sensitive: Value,
    /// Sensitivity markers for `after`.
    #[serde(default)]
    pub after_sensitive: Value,
    /// Import marker; any non-null value means the resource is imported.
    #[serde(default)]
    pub importing: Option<Value>,
}

impl Change {
    /// Returns true if this change imports an existing object.
    #[must_use]
    pub const fn is_import(&self) -> bool {
        self.importing.is_some()
    }

    /// Sensitivity tree aligned with `before`.
    #[must_use]
    pub fn before_sensitivity(&self) -> Sensitivity {
        Sensitivity::from(&self.before_sensitive)
    }

    /// Sensitivity tree aligned with `after`.
    #[must_use]
    pub fn after_sensitivity(&self) -> Sensitivity {
        Sensitivity::from(&self.after_sensitive)
    }
}

impl Plan {
    /// Parses and validates a plan from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a plan document or its format
    /// version is unsupported.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let plan: Self = serde_json::from_slice(bytes)
            .map_err(|e| PlanError::malformed(format!("JSON parse error: {e}")))?;
        plan.validate()?;

        debug!(
            "Parsed plan with {} resource changes and {} output changes",
            plan.resource_changes.len(),
            plan.output_changes.len()
        );
        Ok(plan)
    }

    /// Loads and validates a plan from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid plan.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading plan from: {}", path.display());

        let bytes = std::fs::read(path)?;
        Self::from_slice(&bytes)
    }

    /// Checks that the format version is present and supported.
    ///
    /// # Errors
    ///
    /// Returns an error if the version is missing, unparsable, or outside
    /// `>= 0.1, < 2.0`.
    pub fn validate(&self) -> Result<()> {
        if self.format_version.is_empty() {
            return Err(PlanError::malformed("unexpected plan input, format version is missing").into());
        }

        let (major, minor) = parse_version(&self.format_version).ok_or_else(|| {
            PlanError::malformed(format!(
                "invalid format version {:?}",
                self.format_version
            ))
        })?;

        if (major, minor) < MIN_FORMAT_VERSION || major >= MAX_FORMAT_MAJOR {
            return Err(RunTaskError::Plan(PlanError::UnsupportedFormatVersion {
                version: self.format_version.clone(),
            }));
        }

        Ok(())
    }
}

/// Parses `major.minor[.patch]`.
fn parse_version(version: &str) -> Option<(u64, u64)> {
    let mut parts = version.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    if let Some(patch) = parts.next() {
        patch.parse::<u64>().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some((major, minor))
}
