//! 仪表盘视图 - 业务能力层
//!
//! 把服务端传入的 props 整理成可直接渲染的数据：统计卡片、指标、图表、快捷入口

use crate::models::dashboard::{ActivityRecord, DashboardProps};
use crate::services::metrics::{build_charts, derive_metrics, ChartData, DashboardMetrics};
use serde::Serialize;
use tracing::warn;

/// 最近动态最多展示条数
pub const MAX_RECENT_ACTIVITIES: usize = 5;

/// 快捷入口：(路由名, 标题)
const ACTION_LINKS: [(&str, &str); 3] = [
    ("exams.create", "Create Exam"),
    ("questions.create", "Add Questions"),
    ("results.index", "View Results"),
];

/// 统计卡片
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub title: String,
    pub value: u64,
}

/// 快捷入口
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionLink {
    pub label: String,
    pub href: String,
}

/// 仪表盘视图
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub greeting: String,
    pub cards: Vec<StatCard>,
    pub metrics: DashboardMetrics,
    pub charts: ChartData,
    pub recent_activities: Vec<ActivityRecord>,
    pub actions: Vec<ActionLink>,
}

impl DashboardView {
    pub fn build(props: &DashboardProps) -> Self {
        let metrics = derive_metrics(&props.results, &props.exams);
        let charts = build_charts(&metrics, &props.results);

        let stats = &props.stats;
        let cards = vec![
            StatCard {
                title: "Active Exams".to_string(),
                value: stats.active_exams,
            },
            StatCard {
                title: "Total Students".to_string(),
                value: stats.total_students,
            },
            StatCard {
                title: "Completed Results".to_string(),
                value: stats.completed_results,
            },
            StatCard {
                title: "Question Bank".to_string(),
                value: stats.question_bank,
            },
        ];

        let actions = ACTION_LINKS
            .iter()
            .filter_map(|&(route, label)| match props.routes.get(route) {
                Some(href) => Some(ActionLink {
                    label: label.to_string(),
                    href: href.clone(),
                }),
                None => {
                    warn!("路由表中缺少 {}，跳过快捷入口", route);
                    None
                }
            })
            .collect();

        let name = if props.evaluator.name.is_empty() {
            &props.user.name
        } else {
            &props.evaluator.name
        };
        let greeting = if name.is_empty() {
            "Welcome back".to_string()
        } else {
            format!("Welcome back, {}", name)
        };

        Self {
            greeting,
            cards,
            metrics,
            charts,
            recent_activities: props
                .recent_activities
                .iter()
                .take(MAX_RECENT_ACTIVITIES)
                .cloned()
                .collect(),
            actions,
        }
    }

    /// 纯文本摘要，用于命令行输出
    pub fn render_summary(&self) -> Vec<String> {
        let mut lines = vec![self.greeting.clone()];
        for card in &self.cards {
            lines.push(format!("{}: {}", card.title, card.value));
        }
        lines.push(format!(
            "平均分: {} | 通过: {} | 未通过: {} | 通过率: {}%",
            self.metrics.average_score,
            self.metrics.pass_count,
            self.metrics.fail_count,
            self.metrics.pass_rate
        ));
        lines.push(format!(
            "考试: 启用 {} | 停用 {}",
            self.metrics.active_exams, self.metrics.inactive_exams
        ));
        let distribution = self
            .charts
            .score_distribution
            .iter()
            .map(|s| format!("{}={}", s.label, s.value))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("分数分布: {}", distribution));
        for action in &self.actions {
            lines.push(format!("→ {} ({})", action.label, action.href));
        }
        lines
    }
}
