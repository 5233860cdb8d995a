pub mod bulk_create;
pub mod cache_mirror;
pub mod dashboard;
pub mod metrics;
pub mod notifier;

pub use bulk_create::{BulkCreate, HttpBulkCreateClient};
pub use cache_mirror::CacheMirror;
pub use dashboard::DashboardView;
pub use metrics::{build_charts, derive_metrics, ChartData, DashboardMetrics};
pub use notifier::{AlwaysConfirm, Confirmer, Notifier, RecordingNotifier, Severity, TracingNotifier};
