//! Sensitive value masking.
//!
//! Plans carry a sensitivity tree next to every `before`/`after` value tree.
//! The sensitivity tree mirrors the value's shape and flags the positions
//! whose values must never be displayed.

use std::collections::BTreeMap;

use serde_json::Value;

/// Placeholder substituted for every redacted value.
pub const MASKED_VALUE: &str = "Sensitive value";

/// Marker tree aligned with a plan value tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Sensitivity {
    /// The whole position is (or is not) sensitive.
    Flag(bool),
    /// Per-element markers of a list-valued field.
    List(Vec<Self>),
    /// Per-key markers of an object-valued field.
    Object(BTreeMap<String, Self>),
    /// Anything else; treated as not sensitive.
    #[default]
    Unknown,
}

impl Sensitivity {
    /// Returns true if a `true` flag appears anywhere in this marker.
    fn contains_true(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::List(elements) => elements.iter().any(Self::contains_true),
            Self::Object(markers) => markers.values().any(Self::contains_true),
            Self::Unknown => false,
        }
    }
}

impl From<&Value> for Sensitivity {
    fn from(value: &Value) -> Self {
        match value {
            Value::Bool(flag) => Self::Flag(*flag),
            Value::Array(items) => Self::List(items.iter().map(Self::from).collect()),
            Value::Object(map) => Self::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from(v)))
                    .collect(),
            ),
            Value::Null | Value::Number(_) | Value::String(_) => Self::Unknown,
        }
    }
}

/// Returns a copy of `value` with every sensitive position redacted.
///
/// The result has the same shape as the input. Positions are replaced with
/// [`MASKED_VALUE`] when:
///
/// - the marker is `true` and the value is not null;
/// - the marker is a list with a `true` anywhere inside it, including
///   within nested lists or objects (the whole list field is replaced,
///   individual elements are never masked).
///
/// Object markers recurse into keys present on both sides. Keys missing
/// from the marker, `false` markers, and marker/value shape mismatches leave
/// the value untouched. Masking an already masked tree is a no-op.
#[must_use]
pub fn mask_sensitive(value: &Value, sensitivity: &Sensitivity) -> Value {
    let mut masked = value.clone();
    mask_in_place(&mut masked, sensitivity);
    masked
}

fn mask_in_place(value: &mut Value, sensitivity: &Sensitivity) {
    match sensitivity {
        Sensitivity::Flag(true) => redact(value),
        list @ Sensitivity::List(_) if list.contains_true() => redact(value),
        Sensitivity::Object(markers) => {
            if let Value::Object(fields) = value {
                for (key, field) in fields.iter_mut() {
                    if let Some(marker) = markers.get(key) {
                        mask_in_place(field, marker);
                    }
                }
            }
        }
        Sensitivity::Flag(false) | Sensitivity::List(_) | Sensitivity::Unknown => {}
    }
}

fn redact(value: &mut Value) {
    match value {
        Value::Null => {}
        Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) | Value::Object(_) => {
            *value = Value::String(MASKED_VALUE.to_string());
        }
    }
}
