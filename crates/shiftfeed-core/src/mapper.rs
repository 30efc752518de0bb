//! Record mapper: one raw backend row to one canonical [`Shift`].
//!
//! Mapping never fails. Missing text falls back to placeholders, missing
//! timestamps to [`FALLBACK_START`](crate::temporal::FALLBACK_START) and
//! [`FALLBACK_END`](crate::temporal::FALLBACK_END), unknown statuses to
//! `scheduled`, and an unresolvable id to [`UNRESOLVED_ID`].

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::{FeedConfig, PlaceholderConfig};
use crate::model::confirmation::ConfirmationStatus;
use crate::model::shift::{Shift, ShiftStatus, UNRESOLVED_ID};
use crate::row::RawRow;
use crate::synonyms::{AssignmentSynonyms, ShiftField, ShiftSynonyms};
use crate::temporal::{
    enforce_after, fallback_end, fallback_start, first_temporal, resolve_boundary, to_iso,
};
use crate::visibility::VisibilityPolicy;

static DEFAULT_MAPPER: LazyLock<ShiftMapper> = LazyLock::new(ShiftMapper::default);

/// The pipeline with its tables and policy bound.
#[derive(Debug, Clone, Default)]
pub struct ShiftMapper {
    pub(crate) synonyms: ShiftSynonyms,
    pub(crate) assignment_synonyms: AssignmentSynonyms,
    pub(crate) placeholders: PlaceholderConfig,
    pub(crate) policy: VisibilityPolicy,
}

impl ShiftMapper {
    /// Build a mapper from a loaded config. Synonym overrides are prepended
    /// to the built-in tables.
    #[must_use]
    pub fn from_config(config: &FeedConfig) -> Self {
        let mut synonyms = ShiftSynonyms::default();
        synonyms.apply_overrides(&config.synonyms);
        let mut assignment_synonyms = AssignmentSynonyms::default();
        assignment_synonyms.apply_overrides(&config.assignment_synonyms);

        Self {
            synonyms,
            assignment_synonyms,
            placeholders: config.placeholders.clone(),
            policy: VisibilityPolicy::from_config(&config.visibility),
        }
    }

    /// The mapper used by the free functions.
    #[must_use]
    pub fn shared() -> &'static Self {
        &DEFAULT_MAPPER
    }

    #[must_use]
    pub const fn policy(&self) -> &VisibilityPolicy {
        &self.policy
    }

    /// Map one row. Inline assignment columns, if any, are carried over.
    #[must_use]
    pub fn map_record(&self, row: &RawRow) -> Shift {
        let text = |field: ShiftField| self.text(row, field);

        let id = row
            .first_identifier(self.synonyms.keys(ShiftField::Id))
            .unwrap_or_else(|| {
                debug!(keys = ?row.keys().collect::<Vec<_>>(), "row has no resolvable id");
                UNRESOLVED_ID.to_string()
            });

        let (start, end) = self.resolve_window(row, &id);

        Shift {
            title: text(ShiftField::Title).unwrap_or_else(|| self.placeholders.title.clone()),
            location: text(ShiftField::Location)
                .unwrap_or_else(|| self.placeholders.location.clone()),
            object_name: text(ShiftField::ObjectName),
            object_address: text(ShiftField::ObjectAddress),
            object_contact_name: text(ShiftField::ObjectContactName),
            object_contact_phone: text(ShiftField::ObjectContactPhone),
            object_contact_email: text(ShiftField::ObjectContactEmail),
            start: to_iso(start),
            end: to_iso(end),
            status: ShiftStatus::classify(row.first_text(self.synonyms.keys(ShiftField::Status))),
            description: text(ShiftField::Description),
            assignment_id: row.first_identifier(self.synonyms.keys(ShiftField::AssignmentId)),
            confirmation_status: row
                .first_text(self.synonyms.keys(ShiftField::ConfirmationStatus))
                .and_then(ConfirmationStatus::normalize),
            confirmed_at: first_temporal(row, self.synonyms.keys(ShiftField::ConfirmedAt))
                .and_then(|t| t.instant())
                .map(to_iso),
            id,
        }
    }

    fn text(&self, row: &RawRow, field: ShiftField) -> Option<String> {
        row.first_text(self.synonyms.keys(field)).map(str::to_string)
    }

    fn resolve_window(&self, row: &RawRow, id: &str) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self
            .resolve_instant(row, ShiftField::StartDate, ShiftField::StartTime)
            .unwrap_or_else(|| {
                debug!(id, "no usable start, using fallback");
                fallback_start()
            });
        let raw_end = self
            .resolve_instant(row, ShiftField::EndDate, ShiftField::EndTime)
            .unwrap_or_else(|| {
                debug!(id, "no usable end, using fallback");
                fallback_end()
            });

        let Some(end) = enforce_after(start, raw_end) else {
            debug!(id, start = %to_iso(start), "no end representable after start, using fallback window");
            return (fallback_start(), fallback_end());
        };
        if end != raw_end {
            debug!(id, raw_end = %to_iso(raw_end), end = %to_iso(end), "moved end past start");
        }
        (start, end)
    }

    fn resolve_instant(
        &self,
        row: &RawRow,
        date_field: ShiftField,
        time_field: ShiftField,
    ) -> Option<DateTime<Utc>> {
        resolve_boundary(
            row,
            self.synonyms.keys(date_field),
            self.synonyms.keys(time_field),
        )
    }
}

/// Map one row with the default tables.
#[must_use]
pub fn map_shift_record(row: &RawRow) -> Shift {
    ShiftMapper::shared().map_record(row)
}
