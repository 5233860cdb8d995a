//! 批次导入流程 - 流程层
//!
//! 把 TOML 批次中的题目逐道填入缓冲区再调用 add，
//! 与手工录入走同一套校验和缓存同步

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::models::{DraftBatch, DraftField, DraftInput, OPTION_SLOTS};
use crate::workflow::draft_manager::DraftManager;

/// 导入统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportStats {
    pub added: usize,
    pub rejected: usize,
}

impl ImportStats {
    pub fn merge(&mut self, other: ImportStats) {
        self.added += other.added;
        self.rejected += other.rejected;
    }
}

/// 导入一个批次
pub async fn import_batch(manager: &mut DraftManager, batch: &DraftBatch) -> ImportStats {
    let base_dir = batch
        .file_path
        .as_deref()
        .and_then(|p| Path::new(p).parent())
        .map(Path::to_path_buf)
        .unwrap_or_default();

    info!("[批次 {}] 开始导入 {} 道题目", batch.name, batch.questions.len());

    let mut stats = ImportStats::default();
    for (index, input) in batch.questions.iter().enumerate() {
        let question_index = index + 1;

        fill_buffer(manager, batch, input, &base_dir);
        manager.wait_for_images().await;

        match manager.add() {
            Ok(_) => stats.added += 1,
            Err(e) => {
                warn!("[批次 {}] ⚠️ 第 {} 题未通过校验: {}", batch.name, question_index, e);
                stats.rejected += 1;
            }
        }
    }

    info!(
        "[批次 {}] ✓ 导入完成: 成功 {} | 跳过 {}",
        batch.name, stats.added, stats.rejected
    );
    stats
}

/// 覆盖缓冲区的每个字段，避免上一题校验失败后残留内容
fn fill_buffer(manager: &mut DraftManager, batch: &DraftBatch, input: &DraftInput, base_dir: &Path) {
    if input.options.len() > OPTION_SLOTS {
        warn!(
            "[批次 {}] 题目选项超过 {} 个，多余的将被忽略",
            batch.name, OPTION_SLOTS
        );
    }

    manager.set_field(DraftField::Question, input.question.as_str());
    manager.set_field(DraftField::CorrectAnswer, input.correct_answer.as_str());
    manager.set_field(
        DraftField::Category,
        input
            .category
            .as_deref()
            .or(batch.category.as_deref())
            .unwrap_or_default(),
    );
    manager.set_field(
        DraftField::Direction,
        input.direction.as_deref().unwrap_or_default(),
    );

    for slot in 1..=OPTION_SLOTS as u8 {
        let index = usize::from(slot) - 1;
        manager.set_field(
            DraftField::Option(slot),
            input.options.get(index).map(String::as_str).unwrap_or_default(),
        );
        load_image(
            manager,
            DraftField::OptionImage(slot),
            input.option_images.get(index).map(String::as_str),
            base_dir,
        );
    }

    load_image(
        manager,
        DraftField::QuestionImage,
        input.question_image.as_deref(),
        base_dir,
    );
}

fn load_image(manager: &mut DraftManager, field: DraftField, path: Option<&str>, base_dir: &Path) {
    manager.clear_image(field);
    let file = path
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| resolve(base_dir, p));
    manager.set_image(field, file);
}

fn resolve(base_dir: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryStore;
    use crate::services::{CacheMirror, RecordingNotifier};
    use std::sync::Arc;

    fn manager() -> DraftManager {
        DraftManager::new(
            CacheMirror::new(Arc::new(MemoryStore::new()), "draft_questions"),
            Arc::new(RecordingNotifier::new()),
        )
    }

    fn input(question: &str, options: &[&str], answer: &str) -> DraftInput {
        DraftInput {
            question: question.to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answer: answer.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_import_counts_rejections() {
        let batch = DraftBatch {
            name: "demo".to_string(),
            category: Some("Numerical Ability".to_string()),
            questions: vec![
                input("1 + 1 = ?", &["2", "3"], "A"),
                input("2 + 2 = ?", &["4"], "B"),
                input("3 + 3 = ?", &["5", "6", "7"], "b"),
            ],
            file_path: None,
        };

        let mut manager = manager();
        let stats = import_batch(&mut manager, &batch).await;

        assert_eq!(stats, ImportStats { added: 2, rejected: 1 });
        assert_eq!(manager.len(), 2);
        let last = &manager.drafts()[1];
        assert_eq!(last.question, "3 + 3 = ?");
        assert_eq!(last.option3, "7");
        assert_eq!(last.correct_answer, "B");
        assert_eq!(last.category, "Numerical Ability");
    }

    #[tokio::test]
    async fn test_failed_question_does_not_leak_into_next() {
        let mut first = input("Has five", &["a", "b", "c", "d", "e"], "Z");
        first.direction = Some("Read carefully".to_string());
        let batch = DraftBatch {
            name: "leak".to_string(),
            category: Some("General".to_string()),
            questions: vec![first, input("Has one", &["a"], "A")],
            file_path: None,
        };

        let mut manager = manager();
        import_batch(&mut manager, &batch).await;

        assert_eq!(manager.len(), 1);
        let draft = &manager.drafts()[0];
        assert_eq!(draft.option5, "");
        assert_eq!(draft.direction, "");
    }

    #[test]
    fn test_resolve_relative_to_batch() {
        assert_eq!(
            resolve(Path::new("/data/batches"), "img/q1.png"),
            PathBuf::from("/data/batches/img/q1.png")
        );
        assert_eq!(
            resolve(Path::new("/data/batches"), "/abs/q1.png"),
            PathBuf::from("/abs/q1.png")
        );
    }
}
