//! 草稿管理 - 流程层
//!
//! 持有草稿列表和编辑缓冲区，定义新增/编辑/删除/清空/提交的完整流程。
//!
//! 状态流转：
//! 1. 缓冲区编辑（set_field / set_image / clear_image）
//! 2. add → 校验通过后复制进列表，缓冲区重置
//! 3. edit → 从列表移除并载回缓冲区
//! 4. remove / clear_all / 提交成功 → 从列表消失
//!
//! 列表的每次变化都会同步到本地缓存。

use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::{AppError, AppResult, ValidationError};
use crate::infrastructure::{FsImageReader, ImageReader};
use crate::models::{letter_slot, CategorySet, DraftField, DraftId, DraftQuestion};
use crate::services::{BulkCreate, CacheMirror, Confirmer, Notifier, Severity};

/// 一次图片读取的结果
#[derive(Debug)]
struct ImageLoaded {
    field: DraftField,
    result: AppResult<String>,
}

/// 提交被拒绝的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    /// 列表为空
    Empty,
    /// 已有提交在进行中
    Busy,
}

/// 提交结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 提交成功，附带题目数量
    Submitted(usize),
    /// 后端返回失败，列表保持不变
    Failed,
    /// 未发起提交
    Rejected(SubmitRejected),
}

/// 一次进行中的提交
///
/// 由 `begin_submit` 发出，必须交还给 `finish_submit` 才会解除忙碌状态
#[derive(Debug)]
pub struct SubmitTicket {
    payload: String,
    count: usize,
}

impl SubmitTicket {
    /// 序列化后的整个草稿列表
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// 草稿管理器
///
/// 唯一持有草稿列表和编辑缓冲区。图片读取在后台任务中完成，
/// 结果通过通道送回，只有在 `apply_loaded_images` / `wait_for_images`
/// 时才写入缓冲区。
pub struct DraftManager {
    drafts: Vec<DraftQuestion>,
    buffer: DraftQuestion,
    mirror: CacheMirror,
    notifier: Arc<dyn Notifier>,
    image_reader: Arc<dyn ImageReader>,
    categories: CategorySet,
    image_tx: mpsc::UnboundedSender<ImageLoaded>,
    image_rx: mpsc::UnboundedReceiver<ImageLoaded>,
    images_in_flight: usize,
    submitting: bool,
    last_id: DraftId,
}

impl DraftManager {
    /// 创建草稿管理器，并从本地缓存恢复未提交的草稿
    pub fn new(mut mirror: CacheMirror, notifier: Arc<dyn Notifier>) -> Self {
        let drafts = mirror.load();
        if !drafts.is_empty() {
            info!("📂 已从本地缓存恢复 {} 道草稿", drafts.len());
        }
        let last_id = drafts.iter().filter_map(|d| d.id).max().unwrap_or(0);
        let (image_tx, image_rx) = mpsc::unbounded_channel();

        Self {
            drafts,
            buffer: DraftQuestion::default(),
            mirror,
            notifier,
            image_reader: Arc::new(FsImageReader),
            categories: CategorySet::default(),
            image_tx,
            image_rx,
            images_in_flight: 0,
            submitting: false,
            last_id,
        }
    }

    /// 替换图片读取实现
    pub fn with_image_reader(mut self, reader: Arc<dyn ImageReader>) -> Self {
        self.image_reader = reader;
        self
    }

    /// 设置已知分类
    pub fn with_categories(mut self, categories: CategorySet) -> Self {
        self.categories = categories;
        self
    }

    /// 追加已知分类（例如服务端下发的分类列表）
    pub fn extend_categories<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.categories.insert(name);
        }
    }

    // ========== 只读访问 ==========

    pub fn drafts(&self) -> &[DraftQuestion] {
        &self.drafts
    }

    pub fn buffer(&self) -> &DraftQuestion {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.mirror.has_unsaved_changes()
    }

    pub fn images_in_flight(&self) -> usize {
        self.images_in_flight
    }

    /// 缓冲区当前可选的正确答案字母
    pub fn available_letters(&self) -> Vec<char> {
        self.buffer.available_letters()
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    /// 分类输入提示
    pub fn suggest_categories(&self, input: &str) -> Vec<&str> {
        self.categories.suggest(input)
    }

    // ========== 缓冲区编辑 ==========

    /// 修改缓冲区字段，不做校验
    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        self.buffer.set(field, value);
    }

    /// 清空图片字段
    pub fn clear_image(&mut self, field: DraftField) {
        self.buffer.set(field, String::new());
    }

    /// 异步读取图片到缓冲区字段
    ///
    /// `file` 为 `None` 时不做任何事。读取在后台进行，调用方不会被阻塞；
    /// 结果要等 `apply_loaded_images` 或 `wait_for_images` 时才写入。
    /// 必须在 tokio 运行时内调用。
    ///
    /// # 返回
    /// 是否发起了读取
    pub fn set_image(&mut self, field: DraftField, file: Option<PathBuf>) -> bool {
        let Some(path) = file else {
            return false;
        };
        if !field.is_image() || !field.is_valid() {
            warn!("字段 {} 不是有效的图片字段，忽略图片 {}", field, path.display());
            return false;
        }

        debug!("开始读取图片: {} → {}", path.display(), field);
        let read = self.image_reader.read_data_url(path);
        let tx = self.image_tx.clone();
        self.images_in_flight += 1;

        tokio::spawn(async move {
            // 读取任务 panic 时也要回报，否则 wait_for_images 永远等不到
            let result = AssertUnwindSafe(read)
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(AppError::Other("图片读取任务异常终止".to_string())));
            // 管理器已被丢弃时结果无处可写，直接丢弃
            let _ = tx.send(ImageLoaded { field, result });
        });

        true
    }

    /// 把已完成的图片读取写入缓冲区，不等待未完成的
    ///
    /// # 返回
    /// 本次写入的数量
    pub fn apply_loaded_images(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(loaded) = self.image_rx.try_recv() {
            self.apply_image(loaded);
            applied += 1;
        }
        applied
    }

    /// 等待所有进行中的图片读取完成并写入缓冲区
    pub async fn wait_for_images(&mut self) {
        while self.images_in_flight > 0 {
            match self.image_rx.recv().await {
                Some(loaded) => self.apply_image(loaded),
                None => break,
            }
        }
    }

    fn apply_image(&mut self, loaded: ImageLoaded) {
        self.images_in_flight = self.images_in_flight.saturating_sub(1);
        match loaded.result {
            Ok(data_url) => {
                debug!("图片已写入 {} ({} 字节)", loaded.field, data_url.len());
                self.buffer.set(loaded.field, data_url);
            }
            Err(e) => {
                warn!("图片读取失败 ({}): {}", loaded.field, e);
                self.notifier
                    .notify(&format!("图片读取失败: {}", e), Severity::Error);
            }
        }
    }

    // ========== 列表操作 ==========

    /// 校验缓冲区并加入列表
    ///
    /// 校验失败时给出警告，所有状态保持不变
    pub fn add(&mut self) -> Result<DraftId, ValidationError> {
        if let Err(e) = validate(&self.buffer) {
            self.notifier.notify(&e.to_string(), Severity::Warning);
            return Err(e);
        }

        let id = self.next_id();
        let mut draft = std::mem::take(&mut self.buffer);
        draft.id = Some(id);
        draft.correct_answer = draft.correct_answer.trim().to_ascii_uppercase();
        self.categories.insert(draft.category.clone());

        info!(
            "📝 已添加草稿 #{}: {}",
            self.drafts.len() + 1,
            crate::utils::logging::truncate_text(&draft.question, 40)
        );
        self.drafts.push(draft);
        self.persist();

        Ok(id)
    }

    /// 把草稿移回缓冲区继续编辑，找不到时什么也不做
    pub fn edit(&mut self, id: DraftId) -> bool {
        let Some(index) = self.position(id) else {
            debug!("编辑的草稿 {} 不存在", id);
            return false;
        };

        self.buffer = self.drafts.remove(index);
        self.persist();
        info!("✏️ 草稿 {} 已载入编辑区", id);
        true
    }

    /// 删除草稿，找不到时什么也不做
    pub fn remove(&mut self, id: DraftId) -> bool {
        let Some(index) = self.position(id) else {
            debug!("删除的草稿 {} 不存在", id);
            return false;
        };

        self.drafts.remove(index);
        self.persist();
        info!("🗑️ 草稿 {} 已删除", id);
        true
    }

    /// 用户确认后清空全部草稿
    pub fn clear_all(&mut self, confirmer: &dyn Confirmer) -> bool {
        let message = format!("确定要清空全部 {} 道草稿吗？此操作无法撤销。", self.drafts.len());
        if !confirmer.confirm(&message) {
            debug!("用户取消了清空操作");
            return false;
        }

        self.drafts.clear();
        self.persist();
        info!("🧹 已清空全部草稿");
        true
    }

    // ========== 提交 ==========

    /// 开始提交
    ///
    /// 列表为空时给出警告；已有提交进行中时静默忽略
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, SubmitRejected> {
        if self.submitting {
            debug!("已有提交进行中，忽略本次提交");
            return Err(SubmitRejected::Busy);
        }
        if self.drafts.is_empty() {
            self.notifier
                .notify("请至少添加一道题目后再提交", Severity::Warning);
            return Err(SubmitRejected::Empty);
        }

        // DraftQuestion 只含字符串和整数，序列化不会失败
        let payload = serde_json::to_string(&self.drafts).unwrap_or_else(|_| "[]".to_string());
        self.submitting = true;
        info!("📤 正在提交 {} 道题目...", self.drafts.len());

        Ok(SubmitTicket {
            payload,
            count: self.drafts.len(),
        })
    }

    /// 结束提交
    ///
    /// 成功：提示数量，清空列表和本地缓存。失败：提示错误，列表保持不变
    pub fn finish_submit(&mut self, ticket: SubmitTicket, outcome: AppResult<()>) -> SubmitOutcome {
        self.submitting = false;

        match outcome {
            Ok(()) => {
                self.notifier.notify(
                    &format!("成功提交 {} 道题目", ticket.count),
                    Severity::Success,
                );
                self.drafts.clear();
                self.persist();
                SubmitOutcome::Submitted(ticket.count)
            }
            Err(e) => {
                error!("提交失败: {}", e);
                self.notifier
                    .notify("提交失败，草稿已保留，请稍后重试", Severity::Error);
                SubmitOutcome::Failed
            }
        }
    }

    /// 序列化整个列表并交给批量创建服务
    pub async fn submit(&mut self, client: &dyn BulkCreate) -> SubmitOutcome {
        let ticket = match self.begin_submit() {
            Ok(ticket) => ticket,
            Err(rejected) => return SubmitOutcome::Rejected(rejected),
        };

        let outcome = client.create_questions(ticket.payload.clone()).await;
        self.finish_submit(ticket, outcome)
    }

    // ========== 内部辅助 ==========

    fn position(&self, id: DraftId) -> Option<usize> {
        self.drafts.iter().position(|d| d.id == Some(id))
    }

    /// 以毫秒时间戳为基础，保证单调递增且在列表内唯一
    ///
    /// 编辑中的草稿 id 也视为已占用；到达 `i64::MAX` 后退回最小的空闲 id
    fn next_id(&mut self) -> DraftId {
        let mut id = chrono::Utc::now()
            .timestamp_millis()
            .max(self.last_id.saturating_add(1));
        while self.is_taken(id) {
            id = match id.checked_add(1) {
                Some(next) => next,
                None => (1..=DraftId::MAX)
                    .find(|&candidate| !self.is_taken(candidate))
                    .unwrap_or(0),
            };
        }
        self.last_id = self.last_id.max(id);
        id
    }

    fn is_taken(&self, id: DraftId) -> bool {
        self.position(id).is_some() || self.buffer.id == Some(id)
    }

    fn persist(&mut self) {
        if let Err(e) = self.mirror.sync(&self.drafts) {
            warn!("同步本地草稿失败: {}", e);
        }
    }
}

/// 按固定顺序校验：题干 → 分类 → 选项1 → 正确答案
pub fn validate(draft: &DraftQuestion) -> Result<(), ValidationError> {
    if draft.question.trim().is_empty() {
        return Err(ValidationError::MissingQuestion);
    }
    if draft.category.trim().is_empty() {
        return Err(ValidationError::MissingCategory);
    }
    if draft.option1.trim().is_empty() {
        return Err(ValidationError::MissingFirstOption);
    }

    let answer_ok = letter_slot(&draft.correct_answer)
        .map(|slot| !draft.option(slot).trim().is_empty())
        .unwrap_or(false);
    if !answer_ok {
        let available = draft
            .available_letters()
            .iter()
            .map(char::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ValidationError::AnswerNotAvailable {
            answer: draft.correct_answer.clone(),
            available,
        });
    }

    Ok(())
}
