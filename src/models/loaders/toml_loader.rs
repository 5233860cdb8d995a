use crate::models::batch::DraftBatch;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从 TOML 文件加载一批草稿
pub async fn load_toml_to_draft_batch(toml_file_path: &Path) -> Result<DraftBatch> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let batch: DraftBatch = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    Ok(batch.with_file_path(toml_file_path.to_string_lossy().to_string()))
}

/// 从文件夹中加载所有 TOML 批次（按文件名排序）
///
/// 单个文件解析失败只记录警告，不影响其他文件
pub async fn load_all_toml_files(folder_path: &str) -> Result<Vec<DraftBatch>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }
    toml_files.sort();

    let mut batches = Vec::new();
    for path in toml_files {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_toml_to_draft_batch(&path).await {
            Ok(batch) => {
                tracing::info!("成功加载 {} 个题目", batch.questions.len());
                batches.push(batch);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "eqb-toml-{}-{}-{}",
            tag,
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_load_all_skips_broken_files() {
        let dir = scratch_dir("load");
        std::fs::write(
            dir.join("a.toml"),
            r#"
name = "Set A"
category = "Verbal Ability"

[[questions]]
question = "Synonym of happy?"
options = ["glad", "sad"]
correct_answer = "A"
"#,
        )
        .unwrap();
        std::fs::write(dir.join("b.toml"), "name = ").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let batches = load_all_toml_files(dir.to_str().unwrap()).await.unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].name, "Set A");
        assert_eq!(batches[0].questions[0].options.len(), 2);
        assert!(batches[0].file_path.as_deref().unwrap().ends_with("a.toml"));

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_missing_folder_is_error() {
        let result = load_all_toml_files("/definitely/not/here").await;
        assert!(result.is_err());
    }
}
