pub mod json_loader;
pub mod toml_loader;

pub use json_loader::load_dashboard_props;
pub use toml_loader::{load_all_toml_files, load_toml_to_draft_batch};
