//! 用户提示服务 - 业务能力层
//!
//! 只负责"告诉用户发生了什么"和"向用户确认"，不关心流程

use std::fmt;
use std::sync::Mutex;
use tracing::{error, info, warn};

/// 提示级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Warning => "warning",
            Severity::Success => "success",
            Severity::Error => "error",
        };
        write!(f, "{}", name)
    }
}

/// 用户提示能力
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// 用户确认能力（用于清空等不可撤销操作）
pub trait Confirmer {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirmer for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// 总是同意
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirmer for AlwaysConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// 把提示写入日志
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Warning => warn!("⚠️ {}", message),
            Severity::Success => info!("✅ {}", message),
            Severity::Error => error!("❌ {}", message),
        }
    }
}

/// 记录所有提示，测试时用来断言
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(String, Severity)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已收到的全部提示
    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// 最近一条提示
    pub fn last(&self) -> Option<(String, Severity)> {
        self.messages().pop()
    }

    /// 某个级别的提示数量
    pub fn count(&self, severity: Severity) -> usize {
        self.messages()
            .iter()
            .filter(|(_, s)| *s == severity)
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((message.to_string(), severity));
        }
    }
}

impl<T: Notifier + ?Sized> Notifier for std::sync::Arc<T> {
    fn notify(&self, message: &str, severity: Severity) {
        (**self).notify(message, severity)
    }
}
