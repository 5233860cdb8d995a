pub mod draft_manager;
pub mod import_flow;

pub use draft_manager::{DraftManager, SubmitOutcome, SubmitRejected, SubmitTicket};
pub use import_flow::{import_batch, ImportStats};
