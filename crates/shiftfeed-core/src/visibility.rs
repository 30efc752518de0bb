//! Which confirmation states keep a shift out of an employee's feed.
//!
//! The policy is default-open: shifts with no assignment, no status, or a
//! status outside the hidden set stay visible.

use std::collections::BTreeSet;

use crate::config::VisibilityConfig;
use crate::model::confirmation::ConfirmationStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityPolicy {
    hidden: BTreeSet<String>,
}

impl VisibilityPolicy {
    /// Build a policy hiding the given statuses.
    ///
    /// Entries are normalized like backend values, so aliases such as
    /// `unpublished` hide `not_published` shifts. Blank entries are ignored.
    pub fn hiding<I, S>(statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hidden = statuses
            .into_iter()
            .filter_map(|status| ConfirmationStatus::normalize(status.as_ref()))
            .map(|status| status.as_str().to_string())
            .collect();
        Self { hidden }
    }

    #[must_use]
    pub fn from_config(config: &VisibilityConfig) -> Self {
        Self::hiding(&config.hidden_statuses)
    }

    /// Returns `true` if a shift with this confirmation status may be shown.
    #[must_use]
    pub fn is_visible(&self, status: Option<&ConfirmationStatus>) -> bool {
        status.is_none_or(|status| !self.hidden.contains(status.as_str()))
    }

    pub fn hidden_statuses(&self) -> impl Iterator<Item = &str> {
        self.hidden.iter().map(String::as_str)
    }
}

impl Default for VisibilityPolicy {
    fn default() -> Self {
        Self::from_config(&VisibilityConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_hides_pending_and_unpublished() {
        let policy = VisibilityPolicy::default();
        assert!(!policy.is_visible(Some(&ConfirmationStatus::Pending)));
        assert!(!policy.is_visible(Some(&ConfirmationStatus::NotPublished)));
        assert!(policy.is_visible(Some(&ConfirmationStatus::Published)));
        assert!(policy.is_visible(Some(&ConfirmationStatus::Confirmed)));
        assert!(policy.is_visible(Some(&ConfirmationStatus::Declined)));
        assert!(policy.is_visible(Some(&ConfirmationStatus::Other("on_hold".into()))));
        assert!(policy.is_visible(None));
    }

    #[test]
    fn configured_aliases_are_normalized() {
        let policy = VisibilityPolicy::hiding(["Unpublished", "On Hold", "  "]);
        let hidden: Vec<&str> = policy.hidden_statuses().collect();
        assert_eq!(hidden, vec!["not_published", "on_hold"]);
        assert!(!policy.is_visible(Some(&ConfirmationStatus::NotPublished)));
        assert!(!policy.is_visible(Some(&ConfirmationStatus::Other("on_hold".into()))));
        assert!(policy.is_visible(Some(&ConfirmationStatus::Pending)));
    }
}
