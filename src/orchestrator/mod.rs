//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责装配和调度，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (App：处理 Vec<DraftBatch>)
//!     ↓
//! workflow::import_flow (处理单个 DraftBatch)
//!     ↓
//! workflow::DraftManager (草稿列表 + 编辑缓冲区)
//!     ↓
//! services (能力层：notifier / cache_mirror / bulk_create / metrics)
//!     ↓
//! infrastructure (基础设施：KeyValueStore / ImageReader)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源隔离**：只有编排层创建存储和 HTTP 客户端
//! 2. **向下依赖**：编排层 → workflow → services → infrastructure
//! 3. **无业务逻辑**：只做调度和统计，校验全部在 DraftManager 中

pub mod batch_processor;

pub use batch_processor::App;
