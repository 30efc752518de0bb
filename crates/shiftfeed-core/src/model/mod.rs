pub mod assignment;
pub mod confirmation;
pub mod shift;

pub use assignment::AssignmentMeta;
pub use confirmation::ConfirmationStatus;
pub use shift::{Shift, ShiftStatus};
