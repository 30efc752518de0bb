use serde::{Deserialize, Serialize};

use crate::model::confirmation::ConfirmationStatus;
use crate::model::shift::is_resolved_id;
use crate::row::RawRow;
use crate::synonyms::{AssignmentField, AssignmentSynonyms};
use crate::temporal::{first_temporal, to_iso};

/// One employee's assignment to one shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_id: Option<String>,
    pub shift_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_status: Option<ConfirmationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<String>,
}

impl AssignmentMeta {
    /// Read an assignment row using the default key synonyms.
    ///
    /// Returns `None` when the row does not name a shift.
    #[must_use]
    pub fn from_row(row: &RawRow) -> Option<Self> {
        Self::from_row_with(row, &AssignmentSynonyms::default())
    }

    /// Read an assignment row using an explicit synonym table.
    #[must_use]
    pub fn from_row_with(row: &RawRow, synonyms: &AssignmentSynonyms) -> Option<Self> {
        let shift_id = row
            .first_identifier(synonyms.keys(AssignmentField::ShiftId))
            .filter(|id| is_resolved_id(id))?;

        Some(Self {
            assignment_id: row.first_identifier(synonyms.keys(AssignmentField::Id)),
            shift_id,
            confirmation_status: row
                .first_text(synonyms.keys(AssignmentField::ConfirmationStatus))
                .and_then(ConfirmationStatus::normalize),
            confirmed_at: first_temporal(row, synonyms.keys(AssignmentField::ConfirmedAt))
                .and_then(|t| t.instant())
                .map(to_iso),
        })
    }
}

/// Parse assignment rows, dropping those without a shift id.
#[must_use]
pub fn parse_assignments(rows: &[RawRow]) -> Vec<AssignmentMeta> {
    parse_assignments_with(rows, &AssignmentSynonyms::default())
}

/// [`parse_assignments`] with an explicit synonym table.
#[must_use]
pub fn parse_assignments_with(rows: &[RawRow], synonyms: &AssignmentSynonyms) -> Vec<AssignmentMeta> {
    let parsed: Vec<AssignmentMeta> = rows
        .iter()
        .filter_map(|row| AssignmentMeta::from_row_with(row, synonyms))
        .collect();
    let dropped = rows.len() - parsed.len();
    if dropped > 0 {
        tracing::debug!(dropped, "skipped assignment rows without a shift id");
    }
    parsed
}
