//! Array mapper: rows plus assignments to the visible, ordered feed.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::feed::sort_in_place;
use crate::mapper::ShiftMapper;
use crate::model::assignment::{AssignmentMeta, parse_assignments_with};
use crate::model::shift::Shift;
use crate::row::RawRow;

impl ShiftMapper {
    /// Map, merge, filter, and sort a batch of rows.
    ///
    /// Assignments are matched by shift id (last one wins on duplicates);
    /// rows without a match keep their inline assignment columns. Rows with
    /// an unresolved id and rows whose confirmation status is hidden by the
    /// policy are dropped. Duplicate shift ids collapse to one entry holding
    /// the last row's content in the first row's position.
    #[must_use]
    pub fn map_array(&self, rows: &[RawRow], assignments: &[AssignmentMeta]) -> Vec<Shift> {
        let lookup: HashMap<&str, &AssignmentMeta> = assignments
            .iter()
            .map(|meta| (meta.shift_id.as_str(), meta))
            .collect();

        let mut visible: Vec<Shift> = Vec::with_capacity(rows.len());
        let mut slots: HashMap<String, usize> = HashMap::with_capacity(rows.len());
        let mut unresolved = 0usize;
        let mut hidden = 0usize;

        for row in rows {
            let mut shift = self.map_record(row);
            if !shift.has_resolved_id() {
                unresolved += 1;
                continue;
            }

            if let Some(meta) = lookup.get(shift.id.as_str()) {
                attach(&mut shift, meta);
            }

            if !self.policy.is_visible(shift.confirmation_status.as_ref()) {
                hidden += 1;
                // A later hidden duplicate still supersedes an earlier visible one.
                if let Some(slot) = slots.remove(&shift.id) {
                    visible[slot].id.clear();
                }
                continue;
            }

            if let Some(&slot) = slots.get(&shift.id) {
                warn!(id = %shift.id, "duplicate shift id, keeping the later row");
                visible[slot] = shift;
            } else {
                slots.insert(shift.id.clone(), visible.len());
                visible.push(shift);
            }
        }

        // Drop slots vacated by hidden duplicates.
        visible.retain(Shift::has_resolved_id);

        debug!(
            rows = rows.len(),
            assignments = assignments.len(),
            unresolved,
            hidden,
            visible = visible.len(),
            "mapped shift batch"
        );

        sort_in_place(&mut visible);
        visible
    }

    /// Parse assignment rows with this mapper's synonym table.
    #[must_use]
    pub fn parse_assignments(&self, rows: &[RawRow]) -> Vec<AssignmentMeta> {
        parse_assignments_with(rows, &self.assignment_synonyms)
    }
}

fn attach(shift: &mut Shift, meta: &AssignmentMeta) {
    shift.assignment_id.clone_from(&meta.assignment_id);
    shift.confirmation_status.clone_from(&meta.confirmation_status);
    shift.confirmed_at.clone_from(&meta.confirmed_at);
}

/// Map a batch with the default tables and policy.
#[must_use]
pub fn map_shift_array(rows: &[RawRow], assignments: &[AssignmentMeta]) -> Vec<Shift> {
    ShiftMapper::shared().map_array(rows, assignments)
}
