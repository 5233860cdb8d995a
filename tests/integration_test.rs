use exam_question_builder::error::AppError;
use exam_question_builder::models::{load_toml_to_draft_batch, DashboardProps};
use exam_question_builder::services::{
    AlwaysConfirm, HttpBulkCreateClient, RecordingNotifier,
};
use exam_question_builder::utils::logging;
use exam_question_builder::workflow::{import_batch, SubmitRejected};
use exam_question_builder::{
    AppResult, BulkCreate, CacheMirror, Config, DashboardView, DraftField, DraftManager,
    FileStore, KeyValueStore, MemoryStore, Severity, SubmitOutcome,
};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio_test::{assert_err, assert_ok};

const KEY: &str = "draft_questions";

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "eqb-it-{}-{}-{}",
        tag,
        std::process::id(),
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn manager(store: Arc<dyn KeyValueStore>) -> (DraftManager, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let manager = DraftManager::new(CacheMirror::new(store, KEY), notifier.clone());
    (manager, notifier)
}

fn fill(manager: &mut DraftManager, question: &str) {
    manager.set_field(DraftField::Question, question);
    manager.set_field(DraftField::Category, "General Information");
    manager.set_field(DraftField::Option(1), "Luzon");
    manager.set_field(DraftField::Option(2), "Visayas");
    manager.set_field(DraftField::CorrectAnswer, "B");
}

/// 记录收到的 payload，按需返回成功或失败
struct RecordingClient {
    fail_first: usize,
    calls: AtomicUsize,
    payloads: Mutex<Vec<String>>,
}

impl RecordingClient {
    fn new(fail_first: usize) -> Self {
        Self {
            fail_first,
            calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
        }
    }
}

impl BulkCreate for RecordingClient {
    fn create_questions(&self, questions_json: String) -> BoxFuture<'_, AppResult<()>> {
        async move {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.payloads.lock().unwrap().push(questions_json);
            if call < self.fail_first {
                Err(AppError::bad_response("/evaluator/questions/bulk", Some(500), None))
            } else {
                Ok(())
            }
        }
        .boxed()
    }
}

#[test]
fn test_drafts_survive_reload_from_file_store() {
    let dir = scratch_dir("reload");
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&dir).unwrap());

    let (mut first, _) = manager(store.clone());
    for q in ["Largest island?", "Capital city?", "Longest river?"] {
        fill(&mut first, q);
        assert_ok!(first.add());
    }
    let saved = first.drafts().to_vec();
    drop(first);

    // 模拟刷新页面：重新打开同一个目录
    let reopened: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&dir).unwrap());
    let (second, _) = manager(reopened);
    assert_eq!(second.len(), 3);
    assert_eq!(second.drafts(), saved.as_slice());

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_corrupt_cache_starts_empty() {
    let store = Arc::new(MemoryStore::new());
    store.set(KEY, "[{\"question\": ").unwrap();

    let (manager, notifier) = manager(store.clone());
    assert!(manager.is_empty());
    assert!(!manager.has_unsaved_changes());
    assert_eq!(store.get(KEY).unwrap(), None);
    // 损坏的缓存不提示用户
    assert!(notifier.messages().is_empty());
}

#[test]
fn test_three_adds_then_clear_all() {
    let store = Arc::new(MemoryStore::new());
    let (mut manager, _) = manager(store.clone());
    for q in ["Q1", "Q2", "Q3"] {
        fill(&mut manager, q);
        manager.add().unwrap();
    }
    assert!(store.get(KEY).unwrap().is_some());

    assert!(manager.clear_all(&AlwaysConfirm));
    assert!(manager.is_empty());
    assert_eq!(store.get(KEY).unwrap(), None);
}

#[test]
fn test_answer_must_reference_filled_option() {
    let (mut manager, notifier) = manager(Arc::new(MemoryStore::new()));
    manager.set_field(DraftField::Question, "Pick one");
    manager.set_field(DraftField::Category, "General Information");
    manager.set_field(DraftField::Option(1), "only option");

    manager.set_field(DraftField::CorrectAnswer, "C");
    assert_err!(manager.add());
    assert_eq!(manager.len(), 0);
    assert_eq!(notifier.count(Severity::Warning), 1);

    assert_eq!(manager.available_letters(), vec!['A']);
    manager.set_field(DraftField::CorrectAnswer, "A");
    assert_ok!(manager.add());
    assert_eq!(manager.len(), 1);
}

#[tokio::test]
async fn test_failed_submit_keeps_drafts_for_retry() {
    let store = Arc::new(MemoryStore::new());
    let (mut manager, notifier) = manager(store.clone());
    fill(&mut manager, "Q1");
    manager.add().unwrap();
    fill(&mut manager, "Q2");
    manager.add().unwrap();

    let client = RecordingClient::new(1);

    assert_eq!(manager.submit(&client).await, SubmitOutcome::Failed);
    assert_eq!(manager.len(), 2);
    assert!(store.get(KEY).unwrap().is_some());

    assert_eq!(manager.submit(&client).await, SubmitOutcome::Submitted(2));
    assert!(manager.is_empty());
    assert_eq!(store.get(KEY).unwrap(), None);

    // 两次提交的 payload 相同，且保持插入顺序
    let payloads = client.payloads.lock().unwrap().clone();
    assert_eq!(payloads.len(), 2);
    assert_eq!(payloads[0], payloads[1]);
    let submitted: Vec<serde_json::Value> = serde_json::from_str(&payloads[0]).unwrap();
    assert_eq!(submitted[0]["question"], "Q1");
    assert_eq!(submitted[1]["question"], "Q2");

    assert_eq!(notifier.count(Severity::Error), 1);
    assert_eq!(notifier.count(Severity::Success), 1);

    assert_eq!(
        manager.submit(&client).await,
        SubmitOutcome::Rejected(SubmitRejected::Empty)
    );
}

#[tokio::test]
async fn test_import_toml_batch_with_images() {
    let dir = scratch_dir("import");
    std::fs::create_dir_all(dir.join("img")).unwrap();
    std::fs::write(dir.join("img/map.png"), b"abc").unwrap();
    let toml_path = dir.join("geography.toml");
    std::fs::write(
        &toml_path,
        r#"
name = "Geography"
category = "General Information"

[[questions]]
question = "Which region is shaded?"
question_image = "img/map.png"
options = ["Luzon", "Visayas", "Mindanao"]
option_images = ["", "img/map.png"]
correct_answer = "c"
direction = "Study the map."

[[questions]]
question = "Missing options"
correct_answer = "A"
"#,
    )
    .unwrap();

    let batch = load_toml_to_draft_batch(&toml_path).await.unwrap();
    let (mut manager, _) = manager(Arc::new(MemoryStore::new()));
    let stats = import_batch(&mut manager, &batch).await;

    assert_eq!(stats.added, 1);
    assert_eq!(stats.rejected, 1);
    let draft = &manager.drafts()[0];
    assert_eq!(draft.question_image, "data:image/png;base64,YWJj");
    assert_eq!(draft.option1_image, "");
    assert_eq!(draft.option2_image, "data:image/png;base64,YWJj");
    assert_eq!(draft.correct_answer, "C");
    assert_eq!(draft.direction, "Study the map.");

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn test_dashboard_example_metrics() {
    let props: DashboardProps = serde_json::from_str(
        r#"{
            "user": {"name": "Evaluator One"},
            "stats": {"activeExams": 1, "totalStudents": 2, "completedResults": 2, "questionBank": 10},
            "results": [
                {"scorePercentage": 90, "remarks": "Pass"},
                {"scorePercentage": 70, "remarks": "Fail"}
            ],
            "exams": [{"status": 1}, {"status": 0}, {"status": 0}]
        }"#,
    )
    .unwrap();

    let view = DashboardView::build(&props);
    assert_eq!(view.metrics.average_score, 80);
    assert_eq!(view.metrics.pass_rate, 50);
    assert_eq!(view.metrics.active_exams, 1);
    assert_eq!(view.metrics.inactive_exams, 2);
    assert!(view.actions.is_empty());
    assert_eq!(view.greeting, "Welcome back, Evaluator One");
}

#[tokio::test]
#[ignore] // 需要本地后端，手动运行：cargo test -- --ignored
async fn test_submit_to_backend() {
    logging::init(true);

    let config = Config::from_env();
    let client = HttpBulkCreateClient::new(&config).expect("创建客户端失败");

    let (mut manager, _) = manager(Arc::new(MemoryStore::new()));
    fill(&mut manager, "Integration check");
    manager.add().unwrap();

    let outcome = manager.submit(&client).await;
    assert_eq!(outcome, SubmitOutcome::Submitted(1), "提交应该成功");
}
