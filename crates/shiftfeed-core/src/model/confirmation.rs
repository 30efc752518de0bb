use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// An employee's confirmation state for one assigned shift.
///
/// Backends spell these inconsistently, so parsing folds known aliases onto
/// the canonical variants and keeps anything else as normalized text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfirmationStatus {
    Pending,
    NotPublished,
    Published,
    Confirmed,
    Declined,
    /// Unrecognized status, stored in normalized form.
    Other(String),
}

impl ConfirmationStatus {
    /// Canonical machine string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::NotPublished => "not_published",
            Self::Published => "published",
            Self::Confirmed => "confirmed",
            Self::Declined => "declined",
            Self::Other(raw) => raw.as_str(),
        }
    }

    /// Human-readable label for badges.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::NotPublished => "Not published",
            Self::Published => "Published",
            Self::Confirmed => "Confirmed",
            Self::Declined => "Declined",
            Self::Other(raw) => raw.as_str(),
        }
    }

    /// Returns `true` once the employee has accepted the shift.
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed)
    }

    /// Parse free text from the backend. Blank input means "no status".
    #[must_use]
    pub fn normalize(raw: &str) -> Option<Self> {
        let key = normalize_key(raw);
        if key.is_empty() {
            return None;
        }
        Some(match key.as_str() {
            "pending" | "awaiting" | "awaiting_confirmation" => Self::Pending,
            "not_published" | "unpublished" | "draft" | "hidden" => Self::NotPublished,
            "published" | "sent" | "notified" => Self::Published,
            "confirmed" | "accepted" | "acknowledged" => Self::Confirmed,
            "declined" | "rejected" => Self::Declined,
            _ => Self::Other(key),
        })
    }
}

/// Trim, lowercase, and fold `-` and spaces into `_`.
#[must_use]
pub fn normalize_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

impl fmt::Display for ConfirmationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a confirmation status is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyStatus;

impl fmt::Display for EmptyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("confirmation status is empty")
    }
}

impl std::error::Error for EmptyStatus {}

impl FromStr for ConfirmationStatus {
    type Err = EmptyStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s).ok_or(EmptyStatus)
    }
}

impl Serialize for ConfirmationStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConfirmationStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_fold_onto_canonical_values() {
        let cases = [
            ("pending", ConfirmationStatus::Pending),
            ("Awaiting Confirmation", ConfirmationStatus::Pending),
            ("not-published", ConfirmationStatus::NotPublished),
            ("NOT_PUBLISHED", ConfirmationStatus::NotPublished),
            ("draft", ConfirmationStatus::NotPublished),
            (" published ", ConfirmationStatus::Published),
            ("accepted", ConfirmationStatus::Confirmed),
            ("rejected", ConfirmationStatus::Declined),
        ];
        for (raw, expected) in cases {
            assert_eq!(ConfirmationStatus::normalize(raw), Some(expected), "{raw}");
        }
    }

    #[test]
    fn unknown_values_are_kept_normalized() {
        assert_eq!(
            ConfirmationStatus::normalize("On Hold"),
            Some(ConfirmationStatus::Other("on_hold".to_string()))
        );
        assert_eq!(ConfirmationStatus::normalize("   "), None);
        assert!("".parse::<ConfirmationStatus>().is_err());
    }

    #[test]
    fn labels_and_confirmed_flag() {
        assert_eq!(ConfirmationStatus::NotPublished.label(), "Not published");
        assert!(ConfirmationStatus::Confirmed.is_confirmed());
        assert!(!ConfirmationStatus::Published.is_confirmed());
        assert_eq!(
            ConfirmationStatus::Other("on_hold".into()).label(),
            "on_hold"
        );
    }

    #[test]
    fn serde_uses_canonical_strings() {
        assert_eq!(
            serde_json::to_string(&ConfirmationStatus::NotPublished).expect("serialize"),
            "\"not_published\""
        );
        let parsed: ConfirmationStatus =
            serde_json::from_str("\"Accepted\"").expect("deserialize");
        assert_eq!(parsed, ConfirmationStatus::Confirmed);
    }
}
