//! 批量导入处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责装配各层并驱动一次完整运行。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：校验配置、打开本地缓存、创建提交客户端
//! 2. **草稿恢复**：从本地缓存恢复上次未提交的草稿
//! 3. **批量导入**：扫描 TOML 批次，逐批交给 `import_flow`
//! 4. **提交**：按配置把全部草稿一次性提交
//! 5. **仪表盘**：按配置读取 props 并输出摘要
//! 6. **全局统计**：汇总导入和提交结果

use crate::config::Config;
use crate::error::{AppError, ConfigError};
use crate::infrastructure::FileStore;
use crate::models::{load_all_toml_files, load_dashboard_props, CategorySet, DashboardProps};
use crate::services::{CacheMirror, DashboardView, HttpBulkCreateClient, TracingNotifier};
use crate::utils::logging::{
    init_log_file, log_batch_start, log_startup, print_final_stats,
};
use crate::workflow::{import_batch, DraftManager, ImportStats, SubmitOutcome};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    manager: DraftManager,
    client: HttpBulkCreateClient,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        if reqwest::Url::parse(&config.bulk_create_url).is_err() {
            return Err(AppError::Config(ConfigError::InvalidValue {
                name: "BULK_CREATE_URL".to_string(),
                value: config.bulk_create_url.clone(),
            })
            .into());
        }

        init_log_file(&config.output_log_file)?;
        log_startup(&config.bulk_create_url, &config.cache_dir);

        let store = FileStore::open(&config.cache_dir)
            .with_context(|| format!("无法打开本地缓存目录: {}", config.cache_dir))?;
        let mirror = CacheMirror::new(Arc::new(store), config.cache_key.clone());
        let manager = DraftManager::new(mirror, Arc::new(TracingNotifier))
            .with_categories(CategorySet::new(config.known_categories.iter().cloned()));

        let client = HttpBulkCreateClient::new(&config)?;

        Ok(Self {
            config,
            manager,
            client,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&mut self) -> Result<()> {
        let restored = self.manager.len();
        if restored > 0 {
            info!("💾 本地缓存中有 {} 道未提交的草稿", restored);
        }

        // 先读仪表盘 props，服务端下发的分类参与导入时的分类提示
        let props = match self.config.dashboard_props.clone() {
            Some(path) => Some(load_dashboard_props(Path::new(&path)).await?),
            None => None,
        };
        if let Some(props) = &props {
            self.manager.extend_categories(props.categories.iter().cloned());
            info!("🏷️ 已知分类 {} 个", self.manager.categories().names().len());
        }

        let stats = self.import_all().await?;

        let mut submitted = 0;
        if self.config.auto_submit {
            match self.manager.submit(&self.client).await {
                SubmitOutcome::Submitted(count) => submitted = count,
                SubmitOutcome::Failed => warn!("⚠️ 提交失败，草稿仍保存在本地缓存"),
                SubmitOutcome::Rejected(reason) => info!("未提交: {:?}", reason),
            }
        } else if !self.manager.is_empty() {
            info!(
                "💡 {} 道草稿已保存到本地缓存，设置 AUTO_SUBMIT=true 以提交",
                self.manager.len()
            );
        }

        if let Some(props) = &props {
            self.render_dashboard(props)?;
        }

        print_final_stats(
            stats.added,
            stats.rejected,
            self.manager.len(),
            submitted,
            &self.config.output_log_file,
        );

        Ok(())
    }

    /// 导入全部 TOML 批次
    async fn import_all(&mut self) -> Result<ImportStats> {
        let mut stats = ImportStats::default();

        if !Path::new(&self.config.toml_folder).exists() {
            info!("📁 导入目录 {} 不存在，跳过导入", self.config.toml_folder);
            return Ok(stats);
        }

        info!("\n📁 正在扫描待导入的批次...");
        let batches = load_all_toml_files(&self.config.toml_folder).await?;
        if batches.is_empty() {
            warn!("⚠️ 没有找到待导入的TOML文件");
            return Ok(stats);
        }

        let total = batches.len();
        for (index, batch) in batches.iter().enumerate() {
            log_batch_start(index + 1, total, &batch.name);
            stats.merge(import_batch(&mut self.manager, batch).await);
        }

        Ok(stats)
    }

    fn render_dashboard(&self, props: &DashboardProps) -> Result<()> {
        let view = DashboardView::build(props);

        info!("\n{}", "=".repeat(60));
        info!("📈 仪表盘");
        for line in view.render_summary() {
            info!("{}", line);
        }
        if self.config.verbose_logging {
            info!("{}", serde_json::to_string_pretty(&view.charts)?);
        }
        Ok(())
    }
}
