//! shiftfeed-core library.
//!
//! Turns loosely-typed backend rows into the canonical, ordered shift feed
//! shown to one employee:
//!
//! 1. [`mapper`]: one [`RawRow`] to one [`Shift`].
//! 2. [`pipeline`]: merge assignments, apply the [`VisibilityPolicy`], sort.
//! 3. [`feed`]: drop unparsable starts and re-sort for the live feed.
//!
//! [`phase`] classifies shifts against the clock; [`source`] is the seam to
//! whatever supplies the rows.
//!
//! # Conventions
//!
//! - **Errors**: the pipeline itself never fails. Fetching uses
//!   [`source::SourceError`]; config loading uses `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod config;
pub mod error;
pub mod feed;
pub mod mapper;
pub mod model;
pub mod phase;
pub mod pipeline;
pub mod row;
pub mod source;
pub mod synonyms;
pub mod temporal;
pub mod visibility;

pub use feed::{order_feed, sort_shifts_by_start};
pub use mapper::{ShiftMapper, map_shift_record};
pub use model::{AssignmentMeta, ConfirmationStatus, Shift, ShiftStatus};
pub use phase::{PhaseBuckets, ShiftPhase, effective_status, next_shift, shift_phase};
pub use pipeline::map_shift_array;
pub use row::{FieldValue, RawRow};
pub use visibility::VisibilityPolicy;
