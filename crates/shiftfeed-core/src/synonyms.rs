//! Source-key synonym tables.
//!
//! Each canonical field is resolved by trying an ordered list of source keys
//! and taking the first usable value. The lists live here as data so that
//! schema drift is handled by editing a table (or a config file) rather than
//! the mapper.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical fields read from a shift row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftField {
    Id,
    Title,
    Location,
    ObjectName,
    ObjectAddress,
    ObjectContactName,
    ObjectContactPhone,
    ObjectContactEmail,
    Description,
    Status,
    StartDate,
    StartTime,
    EndDate,
    EndTime,
    AssignmentId,
    ConfirmationStatus,
    ConfirmedAt,
}

/// Canonical fields read from an assignment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentField {
    Id,
    ShiftId,
    ConfirmationStatus,
    ConfirmedAt,
}

const DEFAULT_SHIFT_KEYS: &[(ShiftField, &[&str])] = &[
    (ShiftField::Id, &["id", "shiftId", "shift_id", "uuid"]),
    (
        ShiftField::Title,
        &["title", "shiftTitle", "shift_title", "name", "shiftName", "shift_name"],
    ),
    (
        ShiftField::Location,
        &["location", "shiftLocation", "shift_location", "place"],
    ),
    (
        ShiftField::ObjectName,
        &["objectName", "object_name", "siteName", "site_name", "venue"],
    ),
    (
        ShiftField::ObjectAddress,
        &["objectAddress", "object_address", "siteAddress", "site_address"],
    ),
    (
        ShiftField::ObjectContactName,
        &["objectContactName", "object_contact_name", "contactName", "contact_name"],
    ),
    (
        ShiftField::ObjectContactPhone,
        &["objectContactPhone", "object_contact_phone", "contactPhone", "contact_phone"],
    ),
    (
        ShiftField::ObjectContactEmail,
        &["objectContactEmail", "object_contact_email", "contactEmail", "contact_email"],
    ),
    (
        ShiftField::Description,
        &["description", "shiftDescription", "shift_description", "notes"],
    ),
    (
        ShiftField::Status,
        &["status", "shiftStatus", "shift_status", "state"],
    ),
    (
        ShiftField::StartDate,
        &[
            "shiftStartingDate",
            "shift_starting_date",
            "startDate",
            "start_date",
            "shiftDate",
            "shift_date",
            "date",
        ],
    ),
    (
        ShiftField::StartTime,
        &[
            "shiftStartingTime",
            "shift_starting_time",
            "startTime",
            "start_time",
            "start",
            "startsAt",
            "starts_at",
        ],
    ),
    (
        ShiftField::EndDate,
        &[
            "shiftEndingDate",
            "shift_ending_date",
            "endDate",
            "end_date",
            "shiftDate",
            "shift_date",
            "date",
        ],
    ),
    (
        ShiftField::EndTime,
        &[
            "shiftEndingTime",
            "shift_ending_time",
            "endTime",
            "end_time",
            "end",
            "endsAt",
            "ends_at",
        ],
    ),
    (ShiftField::AssignmentId, &["assignmentId", "assignment_id"]),
    (
        ShiftField::ConfirmationStatus,
        &["confirmationStatus", "confirmation_status"],
    ),
    (ShiftField::ConfirmedAt, &["confirmedAt", "confirmed_at"]),
];

const DEFAULT_ASSIGNMENT_KEYS: &[(AssignmentField, &[&str])] = &[
    (AssignmentField::Id, &["id", "assignmentId", "assignment_id"]),
    (AssignmentField::ShiftId, &["shiftId", "shift_id"]),
    (
        AssignmentField::ConfirmationStatus,
        &["confirmationStatus", "confirmation_status", "status"],
    ),
    (AssignmentField::ConfirmedAt, &["confirmedAt", "confirmed_at"]),
];

/// Ordered candidate keys per canonical field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymTable<F: Ord> {
    keys: BTreeMap<F, Vec<String>>,
}

impl<F: Ord + Copy + fmt::Debug> SynonymTable<F> {
    fn from_static(table: &[(F, &[&str])]) -> Self {
        let keys = table
            .iter()
            .map(|(field, keys)| (*field, keys.iter().map(|k| (*k).to_string()).collect()))
            .collect();
        Self { keys }
    }

    /// Candidate keys for `field`, highest priority first.
    #[must_use]
    pub fn keys(&self, field: F) -> &[String] {
        self.keys.get(&field).map_or(&[][..], Vec::as_slice)
    }

    /// Put `extra` ahead of the existing keys for `field`.
    ///
    /// Keys already present are moved to the front rather than duplicated.
    pub fn prepend(&mut self, field: F, extra: &[String]) {
        let entry = self.keys.entry(field).or_default();
        let mut merged: Vec<String> = Vec::with_capacity(entry.len() + extra.len());
        for key in extra.iter().chain(entry.iter()) {
            if !merged.contains(key) {
                merged.push(key.clone());
            }
        }
        *entry = merged;
    }

    /// Apply a set of overrides, each prepended to its field's list.
    pub fn apply_overrides(&mut self, overrides: &BTreeMap<F, Vec<String>>) {
        for (field, extra) in overrides {
            tracing::debug!(?field, keys = ?extra, "prepending synonym keys");
            self.prepend(*field, extra);
        }
    }
}

impl Default for SynonymTable<ShiftField> {
    fn default() -> Self {
        Self::from_static(DEFAULT_SHIFT_KEYS)
    }
}

impl Default for SynonymTable<AssignmentField> {
    fn default() -> Self {
        Self::from_static(DEFAULT_ASSIGNMENT_KEYS)
    }
}

/// Synonyms for shift rows.
pub type ShiftSynonyms = SynonymTable<ShiftField>;
/// Synonyms for assignment rows.
pub type AssignmentSynonyms = SynonymTable<AssignmentField>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shift_field_has_keys() {
        let table = ShiftSynonyms::default();
        for (field, _) in DEFAULT_SHIFT_KEYS {
            assert!(!table.keys(*field).is_empty(), "{field:?} has no keys");
        }
        assert_eq!(table.keys(ShiftField::Title)[0], "title");
    }

    #[test]
    fn shared_date_keys_come_after_specific_ones() {
        let table = ShiftSynonyms::default();
        let start = table.keys(ShiftField::StartDate);
        let pos_specific = start.iter().position(|k| k == "shiftStartingDate");
        let pos_shared = start.iter().position(|k| k == "date");
        assert!(pos_specific < pos_shared);
    }

    #[test]
    fn prepend_moves_existing_keys_forward() {
        let mut table = ShiftSynonyms::default();
        table.prepend(
            ShiftField::Title,
            &["jobTitle".to_string(), "name".to_string()],
        );
        let keys = table.keys(ShiftField::Title);
        assert_eq!(keys[0], "jobTitle");
        assert_eq!(keys[1], "name");
        assert_eq!(keys.iter().filter(|k| *k == "name").count(), 1);
    }

    #[test]
    fn field_names_parse_from_snake_case() {
        let parsed: BTreeMap<ShiftField, Vec<String>> =
            toml::from_str("object_contact_phone = [\"tel\"]").expect("parse");
        assert_eq!(
            parsed.get(&ShiftField::ObjectContactPhone),
            Some(&vec!["tel".to_string()])
        );
        assert!(toml::from_str::<BTreeMap<ShiftField, Vec<String>>>("nope = []").is_err());
    }

    #[test]
    fn assignment_status_falls_back_to_plain_status() {
        let table = AssignmentSynonyms::default();
        assert_eq!(
            table.keys(AssignmentField::ConfirmationStatus).last(),
            Some(&"status".to_string())
        );
    }
}
