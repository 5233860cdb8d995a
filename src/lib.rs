//! # Exam Question Builder
//!
//! 考试管理系统的题目草稿录入与阅卷人仪表盘
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 只暴露能力，不认识草稿
//! - `KeyValueStore` - 本地持久缓存（`MemoryStore` / `FileStore`）
//! - `ImageReader` - 图片文件 → data URL
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `Notifier` / `Confirmer` - 用户提示与确认
//! - `CacheMirror` - 草稿列表与本地缓存同步
//! - `BulkCreate` - 批量创建题目
//! - `metrics` / `DashboardView` - 仪表盘指标与图表数据
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义草稿的完整生命周期
//! - `DraftManager` - 新增 / 编辑 / 删除 / 清空 / 提交
//! - `import_flow` - TOML 批次导入
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 应用入口，装配各层并驱动运行

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, ValidationError};
pub use infrastructure::{FileStore, KeyValueStore, MemoryStore};
pub use models::{DraftField, DraftId, DraftQuestion};
pub use orchestrator::App;
pub use services::{BulkCreate, CacheMirror, DashboardView, Notifier, Severity};
pub use workflow::{DraftManager, SubmitOutcome};
