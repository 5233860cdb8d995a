pub mod batch;
pub mod category;
pub mod dashboard;
pub mod draft;
pub mod loaders;

pub use batch::{DraftBatch, DraftInput};
pub use category::CategorySet;
pub use dashboard::{
    ActivityRecord, AggregateStats, DashboardProps, EvaluatorProfile, ExamRecord, ResultRecord,
    UserInfo,
};
pub use draft::{letter_slot, slot_letter, DraftField, DraftId, DraftQuestion, OPTION_SLOTS};
pub use loaders::{load_all_toml_files, load_dashboard_props, load_toml_to_draft_batch};
