//! Action classification for plan changes.
//!
//! A plan describes each change with a tuple of one or two action keywords.
//! This module maps those tuples onto a closed set of symbolic operations.

use crate::error::ActionContractViolation;

/// Symbolic operation for a resource or output change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Nothing changes.
    NoOp,
    /// The object is created.
    Create,
    /// A data source is read.
    Read,
    /// The object is updated in place.
    Update,
    /// The object is destroyed.
    Delete,
    /// A replacement is created before the old object is destroyed.
    CreateThenDelete,
    /// The old object is destroyed before the replacement is created.
    DeleteThenCreate,
}

impl Action {
    /// Classifies a plan action tuple.
    ///
    /// # Errors
    ///
    /// Returns [`ActionContractViolation`] for any tuple that is not one of
    /// the seven shapes the plan format defines.
    pub fn classify<S: AsRef<str>>(actions: &[S]) -> Result<Self, ActionContractViolation> {
        let keywords: Vec<&str> = actions.iter().map(AsRef::as_ref).collect();

        let action = match keywords.as_slice() {
            ["create", "delete"] => Some(Self::CreateThenDelete),
            ["delete", "create"] => Some(Self::DeleteThenCreate),
            ["create"] => Some(Self::Create),
            ["delete"] => Some(Self::Delete),
            ["update"] => Some(Self::Update),
            ["read"] => Some(Self::Read),
            ["no-op"] => Some(Self::NoOp),
            _ => None,
        };

        action.ok_or_else(|| ActionContractViolation {
            actions: keywords.iter().map(|k| (*k).to_string()).collect(),
        })
    }

    /// Returns the display glyph for this action.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::NoOp => "   ",
            Self::Create => "+",
            Self::Read => "<=",
            Self::Update => "~",
            Self::Delete => "-",
            Self::CreateThenDelete => "+/-",
            Self::DeleteThenCreate => "-/+",
        }
    }

    /// Returns true if a create is part of this action.
    #[must_use]
    pub const fn creates(self) -> bool {
        matches!(
            self,
            Self::Create | Self::CreateThenDelete | Self::DeleteThenCreate
        )
    }

    /// Returns true if a delete is part of this action.
    #[must_use]
    pub const fn deletes(self) -> bool {
        matches!(
            self,
            Self::Delete | Self::CreateThenDelete | Self::DeleteThenCreate
        )
    }

    /// Returns true if this is an in-place update.
    #[must_use]
    pub const fn updates(self) -> bool {
        matches!(self, Self::Update)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_defined_shapes() {
        let cases: [(&[&str], Action); 7] = [
            (&["no-op"], Action::NoOp),
            (&["create"], Action::Create),
            (&["read"], Action::Read),
            (&["update"], Action::Update),
            (&["delete"], Action::Delete),
            (&["create", "delete"], Action::CreateThenDelete),
            (&["delete", "create"], Action::DeleteThenCreate),
        ];

        for (actions, expected) in cases {
            assert_eq!(Action::classify(actions), Ok(expected), "{actions:?}");
        }
    }

    #[test]
    fn test_classify_rejects_other_shapes() {
        let rejected: [&[&str]; 6] = [
            &[],
            &["update", "delete"],
            &["create", "create"],
            &["create", "delete", "create"],
            &["destroy"],
            &["no-op", "create"],
        ];

        for actions in rejected {
            let err = Action::classify(actions).unwrap_err();
            assert_eq!(err.actions, actions.iter().map(|a| (*a).to_string()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_classify_owned_keywords() {
        let actions = vec![String::from("delete"), String::from("create")];
        assert_eq!(Action::classify(&actions), Ok(Action::DeleteThenCreate));
    }

    #[test]
    fn test_symbols() {
        assert_eq!(Action::NoOp.symbol(), "   ");
        assert_eq!(Action::Create.symbol(), "+");
        assert_eq!(Action::Delete.symbol(), "-");
        assert_eq!(Action::Read.symbol(), "<=");
        assert_eq!(Action::Update.symbol(), "~");
        assert_eq!(Action::CreateThenDelete.symbol(), "+/-");
        assert_eq!(Action::DeleteThenCreate.symbol(), "-/+");
        assert_eq!(Action::Update.to_string(), "~");
    }

    #[test]
    fn test_replace_creates_and_deletes() {
        for action in [Action::CreateThenDelete, Action::DeleteThenCreate] {
            assert!(action.creates());
            assert!(action.deletes());
            assert!(!action.updates());
        }
        assert!(!Action::Read.creates());
        assert!(!Action::Read.deletes());
        assert!(!Action::NoOp.updates());
    }
}
