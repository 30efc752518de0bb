use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::model::confirmation::ConfirmationStatus;
use crate::temporal::parse_instant;

/// Id assigned to rows whose identifier could not be resolved.
pub const UNRESOLVED_ID: &str = "unknown";

/// The four shift lifecycle states shown on badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShiftStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Blocked,
}

impl ShiftStatus {
    pub const ALL: [Self; 4] = [
        Self::Scheduled,
        Self::InProgress,
        Self::Completed,
        Self::Blocked,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Blocked => "blocked",
        }
    }

    /// Best-effort classification of free-text backend status.
    ///
    /// Substring matches on the lowercased input; anything unrecognized,
    /// including a missing value, is [`ShiftStatus::Scheduled`].
    #[must_use]
    pub fn classify(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Scheduled;
        };
        let lowered = raw.to_lowercase();
        if lowered.contains("progress") {
            Self::InProgress
        } else if lowered.contains("complete") {
            Self::Completed
        } else if lowered.contains("block") {
            Self::Blocked
        } else {
            Self::Scheduled
        }
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an exact shift status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    pub got: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid shift status '{}': expected scheduled, in-progress, completed or blocked",
            self.got
        )
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for ShiftStatus {
    type Err = ParseStatusError;

    /// Strict parse of the canonical strings. Use [`ShiftStatus::classify`]
    /// for backend text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| ParseStatusError { got: s.to_string() })
    }
}

/// Canonical, UI-ready shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: String,
    pub title: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_contact_email: Option<String>,
    /// ISO-8601 start. Always parseable when produced by the mapper.
    pub start: String,
    /// ISO-8601 end, strictly after `start` when produced by the mapper.
    pub end: String,
    #[serde(default)]
    pub status: ShiftStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_status: Option<ConfirmationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<String>,
}

impl Shift {
    /// Parsed `start`, or `None` if it is not a valid timestamp.
    #[must_use]
    pub fn start_at(&self) -> Option<DateTime<Utc>> {
        parse_instant(&self.start)
    }

    /// Parsed `end`, or `None` if it is not a valid timestamp.
    #[must_use]
    pub fn end_at(&self) -> Option<DateTime<Utc>> {
        parse_instant(&self.end)
    }

    /// `false` for the unresolved sentinel and for blank ids.
    #[must_use]
    pub fn has_resolved_id(&self) -> bool {
        is_resolved_id(&self.id)
    }

    /// Returns `true` once the employee has confirmed this shift.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.confirmation_status
            .as_ref()
            .is_some_and(ConfirmationStatus::is_confirmed)
    }
}

/// `false` for the unresolved sentinel and for blank ids.
#[must_use]
pub fn is_resolved_id(id: &str) -> bool {
    let trimmed = id.trim();
    !trimmed.is_empty() && trimmed != UNRESOLVED_ID
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Shift {
        Shift {
            id: "shift-1".into(),
            title: "Lobby".into(),
            location: "TBD".into(),
            object_name: None,
            object_address: None,
            object_contact_name: None,
            object_contact_phone: None,
            object_contact_email: None,
            start: "2026-03-01T08:00:00.000Z".into(),
            end: "2026-03-01T16:00:00.000Z".into(),
            status: ShiftStatus::Scheduled,
            description: None,
            assignment_id: None,
            confirmation_status: None,
            confirmed_at: None,
        }
    }

    #[test]
    fn classify_matches_substrings() {
        assert_eq!(ShiftStatus::classify(Some("In Progress")), ShiftStatus::InProgress);
        assert_eq!(ShiftStatus::classify(Some("in-progress")), ShiftStatus::InProgress);
        assert_eq!(ShiftStatus::classify(Some("COMPLETED")), ShiftStatus::Completed);
        assert_eq!(ShiftStatus::classify(Some("incomplete")), ShiftStatus::Completed);
        assert_eq!(ShiftStatus::classify(Some("blocked")), ShiftStatus::Blocked);
        assert_eq!(ShiftStatus::classify(Some("scheduled")), ShiftStatus::Scheduled);
        assert_eq!(ShiftStatus::classify(Some("cancelled")), ShiftStatus::Scheduled);
        assert_eq!(ShiftStatus::classify(None), ShiftStatus::Scheduled);
    }

    #[test]
    fn strict_parse_accepts_only_canonical_strings() {
        for status in ShiftStatus::ALL {
            assert_eq!(status.as_str().parse::<ShiftStatus>(), Ok(status));
        }
        let err = "in progress".parse::<ShiftStatus>().unwrap_err();
        assert!(err.to_string().contains("in progress"));
    }

    #[test]
    fn status_serde_names_match_display_names() {
        for status in ShiftStatus::ALL {
            let json = serde_json::to_value(status).expect("serialize");
            assert_eq!(json, status.as_str());
            let back: ShiftStatus = serde_json::from_value(json).expect("deserialize");
            assert_eq!(back, status);
        }
        assert_eq!(
            serde_json::to_value(ShiftStatus::InProgress).expect("serialize"),
            "in-progress"
        );
        assert!(serde_json::from_str::<ShiftStatus>("\"InProgress\"").is_err());
    }

    #[test]
    fn serializes_with_camel_case_and_skips_empty_options() {
        let json = serde_json::to_value(sample()).expect("serialize");
        assert_eq!(json["status"], "scheduled");
        assert_eq!(json["start"], "2026-03-01T08:00:00.000Z");
        assert!(json.get("objectName").is_none());
        assert!(json.get("confirmationStatus").is_none());

        let mut shift = sample();
        shift.status = ShiftStatus::InProgress;
        shift.confirmation_status = Some(ConfirmationStatus::Confirmed);
        let json = serde_json::to_value(&shift).expect("serialize");
        assert_eq!(json["status"], "in-progress");
        assert_eq!(json["confirmationStatus"], "confirmed");
        let back: Shift = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, shift);
        assert!(back.is_confirmed());
    }

    #[test]
    fn resolved_id_rules() {
        assert!(sample().has_resolved_id());
        assert!(!is_resolved_id(UNRESOLVED_ID));
        assert!(!is_resolved_id("  "));
    }

    #[test]
    fn timestamps_parse_lazily() {
        let mut shift = sample();
        assert!(shift.start_at().is_some());
        shift.start = "garbage".into();
        assert!(shift.start_at().is_none());
        assert!(shift.end_at().is_some());
    }
}
