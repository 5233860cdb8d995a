use serde::{Deserialize, Serialize};

/// 一个 TOML 导入文件：一批待录入的草稿
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftBatch {
    pub name: String,
    /// 批次默认分类，题目未单独指定时使用
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub questions: Vec<DraftInput>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

/// 批次中的单道题目
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DraftInput {
    pub question: String,
    /// 依次对应 A..E，最多 5 个
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    /// 图片路径，相对于 TOML 文件
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_image: Option<String>,
    /// 依次对应选项的图片路径，空字符串表示无图
    #[serde(default)]
    pub option_images: Vec<String>,
}

impl DraftBatch {
    pub fn with_file_path(mut self, file_path: String) -> Self {
        self.file_path = Some(file_path);
        self
    }
}
