use crate::models::dashboard::DashboardProps;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 JSON 文件加载仪表盘数据
pub async fn load_dashboard_props(path: &Path) -> Result<DashboardProps> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取仪表盘数据: {}", path.display()))?;

    let props: DashboardProps = serde_json::from_str(&content)
        .with_context(|| format!("无法解析仪表盘数据: {}", path.display()))?;

    tracing::debug!(
        "仪表盘数据: {} 条成绩, {} 场考试",
        props.results.len(),
        props.exams.len()
    );

    Ok(props)
}
