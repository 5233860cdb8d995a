//! 本地缓存镜像 - 业务能力层
//!
//! 把草稿列表同步到键值存储中的一个固定槽位，刷新后可以恢复未提交的草稿

use crate::error::AppResult;
use crate::infrastructure::KeyValueStore;
use crate::models::DraftQuestion;
use std::sync::Arc;
use tracing::{debug, warn};

/// 本地缓存镜像
///
/// 规则：
/// - 列表非空：整表序列化写入槽位，标记"有未保存的本地修改"
/// - 列表为空：删除槽位，清除标记
/// - 加载时内容无法解析：删除槽位，按空列表处理
pub struct CacheMirror {
    store: Arc<dyn KeyValueStore>,
    key: String,
    has_unsaved_changes: bool,
}

impl CacheMirror {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            has_unsaved_changes: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    /// 读取缓存中的草稿列表
    ///
    /// 槽位不存在或内容损坏时返回空列表，损坏的内容会被删除
    pub fn load(&mut self) -> Vec<DraftQuestion> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.has_unsaved_changes = false;
                return Vec::new();
            }
            Err(e) => {
                warn!("读取本地草稿失败: {}", e);
                self.has_unsaved_changes = false;
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<DraftQuestion>>(&raw) {
            Ok(drafts) if drafts.is_empty() => {
                self.discard();
                Vec::new()
            }
            Ok(drafts) => {
                debug!("从本地缓存恢复 {} 道草稿", drafts.len());
                self.has_unsaved_changes = true;
                drafts
            }
            Err(e) => {
                debug!("本地草稿已损坏，丢弃: {}", e);
                self.discard();
                Vec::new()
            }
        }
    }

    /// 按列表当前内容同步槽位
    pub fn sync(&mut self, drafts: &[DraftQuestion]) -> AppResult<()> {
        if drafts.is_empty() {
            self.has_unsaved_changes = false;
            self.store.delete(&self.key)?;
            return Ok(());
        }

        let raw = serde_json::to_string(drafts)?;
        self.store.set(&self.key, &raw)?;
        self.has_unsaved_changes = true;
        Ok(())
    }

    /// 删除槽位
    pub fn clear(&mut self) -> AppResult<()> {
        self.sync(&[])
    }

    fn discard(&mut self) {
        self.has_unsaved_changes = false;
        if let Err(e) = self.store.delete(&self.key) {
            warn!("删除损坏的本地草稿失败: {}", e);
        }
    }
}
