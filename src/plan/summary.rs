//! Running tally of plan changes.

use super::action::Action;

/// Counters accumulated over one render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    /// Resources to create.
    pub add: usize,
    /// Resources to update in place.
    pub change: usize,
    /// Resources to destroy.
    pub remove: usize,
    /// Resources to import.
    pub import: usize,
}

impl ChangeSummary {
    /// Creates an empty summary.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            add: 0,
            change: 0,
            remove: 0,
            import: 0,
        }
    }

    /// Records a classified change.
    ///
    /// A replace counts once towards `add` and once towards `remove`.
    pub const fn record(&mut self, action: Action) {
        if action.creates() {
            self.add += 1;
        }
        if action.updates() {
            self.change += 1;
        }
        if action.deletes() {
            self.remove += 1;
        }
    }

    /// Records an imported resource.
    pub const fn record_import(&mut self) {
        self.import += 1;
    }
}

impl std::fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.import > 0 {
            write!(f, "& {} to import, ", self.import)?;
        }
        write!(
            f,
            "+ {} to add, ~ {} to change, - {} to destroy.",
            self.add, self.change, self.remove
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_text_without_import() {
        let summary = ChangeSummary {
            add: 1,
            change: 2,
            remove: 3,
            import: 0,
        };
        assert_eq!(
            summary.to_string(),
            "+ 1 to add, ~ 2 to change, - 3 to destroy."
        );
    }

    #[test]
    fn test_summary_text_with_import() {
        let mut summary = ChangeSummary::new();
        summary.record_import();
        summary.record_import();
        summary.record(Action::Create);
        assert_eq!(
            summary.to_string(),
            "& 2 to import, + 1 to add, ~ 0 to change, - 0 to destroy."
        );
    }

    #[test]
    fn test_replace_counts_add_and_remove() {
        for action in [Action::CreateThenDelete, Action::DeleteThenCreate] {
            let mut summary = ChangeSummary::new();
            summary.record(action);
            assert_eq!(summary.add, 1);
            assert_eq!(summary.remove, 1);
            assert_eq!(summary.change, 0);
            assert_eq!(summary.import, 0);
        }
    }

    #[test]
    fn test_read_and_noop_count_nothing() {
        let mut summary = ChangeSummary::new();
        summary.record(Action::Read);
        summary.record(Action::NoOp);
        assert_eq!(summary, ChangeSummary::default());
    }
}
