//! 仪表盘指标计算 - 业务能力层
//!
//! 纯函数：只根据输入的成绩和考试数组计算汇总数字与图表数据

use crate::models::dashboard::{ExamRecord, ResultRecord, ACTIVE_STATUS, PASS_REMARK};
use serde::Serialize;

/// 汇总指标
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardMetrics {
    pub average_score: i64,
    pub pass_count: usize,
    pub fail_count: usize,
    pub pass_rate: i64,
    pub active_exams: usize,
    pub inactive_exams: usize,
}

/// 图表中的一个分片
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSlice {
    pub label: String,
    pub value: usize,
}

impl ChartSlice {
    fn new(label: &str, value: usize) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }
}

/// 三个图表的数据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub pass_fail: Vec<ChartSlice>,
    pub exam_status: Vec<ChartSlice>,
    pub score_distribution: Vec<ChartSlice>,
}

/// 分数区间（闭区间）
const SCORE_BUCKETS: [(&str, f64, f64); 5] = [
    ("0-59", 0.0, 59.0),
    ("60-69", 60.0, 69.0),
    ("70-79", 70.0, 79.0),
    ("80-89", 80.0, 89.0),
    ("90-100", 90.0, 100.0),
];

/// 四舍五入（.5 向上取整）
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// 计算汇总指标
///
/// 空数组不会触发除零，对应指标返回 0
pub fn derive_metrics(results: &[ResultRecord], exams: &[ExamRecord]) -> DashboardMetrics {
    let total = results.len();

    let average_score = if total == 0 {
        0
    } else {
        let sum: f64 = results.iter().map(|r| r.score_percentage).sum();
        round_half_up(sum / total as f64)
    };

    let pass_count = results.iter().filter(|r| r.remarks == PASS_REMARK).count();
    let fail_count = total.saturating_sub(pass_count);

    let pass_rate = if total == 0 {
        0
    } else {
        round_half_up(pass_count as f64 / total as f64 * 100.0)
    };

    let active_exams = exams.iter().filter(|e| e.status == ACTIVE_STATUS).count();
    let inactive_exams = exams.len().saturating_sub(active_exams);

    DashboardMetrics {
        average_score,
        pass_count,
        fail_count,
        pass_rate,
        active_exams,
        inactive_exams,
    }
}

/// 生成图表数据
pub fn build_charts(metrics: &DashboardMetrics, results: &[ResultRecord]) -> ChartData {
    let mut distribution = [0usize; SCORE_BUCKETS.len()];
    for result in results {
        // 非法分数（NaN 等）按 0 计入
        let score = if result.score_percentage.is_finite() {
            result.score_percentage.clamp(0.0, 100.0)
        } else {
            0.0
        };
        let index = SCORE_BUCKETS
            .iter()
            .position(|&(_, _, high)| score < high + 1.0)
            .unwrap_or(SCORE_BUCKETS.len() - 1);
        distribution[index] += 1;
    }

    ChartData {
        pass_fail: vec![
            ChartSlice::new("Pass", metrics.pass_count),
            ChartSlice::new("Fail", metrics.fail_count),
        ],
        exam_status: vec![
            ChartSlice::new("Active", metrics.active_exams),
            ChartSlice::new("Inactive", metrics.inactive_exams),
        ],
        score_distribution: SCORE_BUCKETS
            .iter()
            .zip(distribution)
            .map(|(&(label, _, _), count)| ChartSlice::new(label, count))
            .collect(),
    }
}
