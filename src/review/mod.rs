// Submission review workflow
//
// A floorplan submission moves pending -> approved/denied and back to pending
// through undo. The store validates each request locally, sends it to the
// remote gateway and only then updates its cached copy.

pub mod errors;
pub mod history;
pub mod state_machine;
pub mod store;
pub mod transaction;
pub mod types;


pub use errors::ReviewError;
pub use history::ReviewHistory;
pub use state_machine::{
    plan_transition, DenialReason, PresetReason, ReviewCommand, ReviewCommandKind, ReviewPolicy,
    TransitionPlan, UndoTarget, DEFAULT_MIN_REASON_LENGTH,
};
pub use store::SubmissionStore;
pub use transaction::ReviewTransaction;
pub use types::{
    NewSubmission, ReviewAction, ReviewFields, ReviewSummary, Submission, SubmissionFilter,
    SubmissionStatus, SubmissionUpdate,
};
