/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 批量创建题目的接口地址
    pub bulk_create_url: String,
    /// 接口令牌（可选，作为 Bearer 发送）
    pub api_token: Option<String>,
    /// 本地缓存目录
    pub cache_dir: String,
    /// 草稿在本地缓存中的固定键名
    pub cache_key: String,
    /// 待导入的 TOML 文件目录
    pub toml_folder: String,
    /// 仪表盘数据文件（JSON，可选）
    pub dashboard_props: Option<String>,
    /// 已知题目分类，用于输入提示
    pub known_categories: Vec<String>,
    /// 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 导入完成后是否自动提交
    pub auto_submit: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bulk_create_url: "http://127.0.0.1:8000/evaluator/questions/bulk".to_string(),
            api_token: None,
            cache_dir: ".draft_cache".to_string(),
            cache_key: "draft_questions".to_string(),
            toml_folder: "draft_toml".to_string(),
            dashboard_props: None,
            known_categories: vec![
                "Verbal Ability".to_string(),
                "Numerical Ability".to_string(),
                "Analytical Ability".to_string(),
                "General Information".to_string(),
                "Philippine Constitution".to_string(),
            ],
            request_timeout_secs: 30,
            auto_submit: false,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            bulk_create_url: std::env::var("BULK_CREATE_URL").unwrap_or(default.bulk_create_url),
            api_token: std::env::var("API_TOKEN").ok().filter(|v| !v.is_empty()).or(default.api_token),
            cache_dir: std::env::var("CACHE_DIR").unwrap_or(default.cache_dir),
            cache_key: std::env::var("CACHE_KEY").unwrap_or(default.cache_key),
            toml_folder: std::env::var("TOML_FOLDER").unwrap_or(default.toml_folder),
            dashboard_props: std::env::var("DASHBOARD_PROPS").ok().filter(|v| !v.is_empty()).or(default.dashboard_props),
            known_categories: std::env::var("KNOWN_CATEGORIES").ok().map(|v| parse_categories(&v)).unwrap_or(default.known_categories),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            auto_submit: std::env::var("AUTO_SUBMIT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.auto_submit),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }
}

/// 解析逗号分隔的分类列表，忽略空项
fn parse_categories(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
