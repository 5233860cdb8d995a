use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 备注字段中表示"通过"的字面值
pub const PASS_REMARK: &str = "Pass";

/// 考试状态码：1 表示启用
pub const ACTIVE_STATUS: i64 = 1;

/// 成绩记录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub exam_title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub score_percentage: f64,
    #[serde(default)]
    pub remarks: String,
}

/// 考试记录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_status")]
    pub status: i64,
}

/// 最近动态
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// 服务端提供的聚合统计
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AggregateStats {
    pub active_exams: u64,
    pub total_students: u64,
    pub completed_results: u64,
    pub question_bank: u64,
}

/// 当前用户
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
}

/// 阅卷人资料
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EvaluatorProfile {
    pub name: String,
    pub department: Option<String>,
}

/// 仪表盘页面的全部输入
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardProps {
    pub user: UserInfo,
    pub evaluator: EvaluatorProfile,
    /// 路由名 → 路径
    pub routes: HashMap<String, String>,
    pub stats: AggregateStats,
    pub recent_activities: Vec<ActivityRecord>,
    pub results: Vec<ResultRecord>,
    pub exams: Vec<ExamRecord>,
    pub categories: Vec<String>,
}

// 服务端有时把数字序列化为字符串（例如 "87.50"）
fn deserialize_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct NumberVisitor;

    impl<'de> Visitor<'de> for NumberVisitor {
        type Value = f64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number or numeric string")
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value as f64)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value as f64)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            value.trim().parse().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(NumberVisitor)
}

fn deserialize_status<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = deserialize_number(deserializer)?;
    Ok(value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_props_parse_camel_case_and_string_numbers() {
        let raw = r#"{
            "stats": {"activeExams": 3, "totalStudents": 40, "completedResults": 12, "questionBank": 250},
            "results": [
                {"scorePercentage": "90.00", "remarks": "Pass"},
                {"scorePercentage": 70, "remarks": "Fail"}
            ],
            "exams": [{"status": 1}, {"status": "0"}],
            "routes": {"exams.create": "/evaluator/exams/create"}
        }"#;

        let props: DashboardProps = serde_json::from_str(raw).unwrap();
        assert_eq!(props.stats.question_bank, 250);
        assert_eq!(props.results[0].score_percentage, 90.0);
        assert_eq!(props.exams[1].status, 0);
        assert!(props.categories.is_empty());
    }

    #[test]
    fn test_missing_score_and_status_default_to_zero() {
        let raw = r#"{
            "results": [{"studentName": "Ana", "remarks": "Fail"}],
            "exams": [{"title": "Draft exam"}],
            "categories": ["Verbal Ability"]
        }"#;

        let props: DashboardProps = serde_json::from_str(raw).unwrap();
        assert_eq!(props.results[0].score_percentage, 0.0);
        assert_eq!(props.exams[0].status, 0);
        assert_eq!(props.categories, vec!["Verbal Ability"]);
    }
}
