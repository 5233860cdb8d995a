//! 批量创建题目 - 业务能力层
//!
//! 把序列化好的草稿列表交给后端，只返回成功或失败

use crate::config::Config;
use crate::error::{AppError, AppResult};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::multipart::Form;
use std::time::Duration;
use tracing::debug;

/// 表单字段名
pub const QUESTIONS_FIELD: &str = "questions";

/// 批量创建能力
pub trait BulkCreate: Send + Sync {
    /// `questions_json` 为整个草稿列表的 JSON
    fn create_questions(&self, questions_json: String) -> BoxFuture<'_, AppResult<()>>;
}

/// 基于 HTTP 的批量创建客户端
///
/// 以 multipart 表单提交，唯一字段为 `questions`，任何 2xx 都视为成功
pub struct HttpBulkCreateClient {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl HttpBulkCreateClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::api_request_failed(&config.bulk_create_url, e))?;

        Ok(Self {
            client,
            url: config.bulk_create_url.clone(),
            token: config.api_token.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post(&self, questions_json: String) -> AppResult<()> {
        debug!("提交题目 Payload 长度: {} 字节", questions_json.len());

        let form = Form::new().text(QUESTIONS_FIELD, questions_json);
        let mut request = self
            .client
            .post(&self.url)
            .header(reqwest::header::ACCEPT, "application/json, text/plain, */*")
            .multipart(form);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&self.url, e))?;

        let status = response.status();
        if status.is_success() {
            debug!("提交题目结果: {}", status);
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::bad_response(
            &self.url,
            Some(status.as_u16()),
            extract_message(&body),
        ))
    }
}

impl BulkCreate for HttpBulkCreateClient {
    fn create_questions(&self, questions_json: String) -> BoxFuture<'_, AppResult<()>> {
        self.post(questions_json).boxed()
    }
}

/// 从错误响应中提取 message 字段，不是 JSON 时返回原文
fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value
            .get("message")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .or_else(|| Some(body.to_string())),
        Err(_) => Some(crate::utils::logging::truncate_text(body, 200)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message() {
        assert_eq!(
            extract_message(r#"{"message": "The questions field is required."}"#),
            Some("The questions field is required.".to_string())
        );
        assert_eq!(extract_message("  "), None);
        assert_eq!(
            extract_message("Server Error"),
            Some("Server Error".to_string())
        );
    }

    /// 需要本地后端，手动运行：cargo test -- --ignored
    #[tokio::test]
    #[ignore]
    async fn test_post_to_local_backend() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::from_env();
        let client = HttpBulkCreateClient::new(&config).expect("创建客户端失败");
        let result = client.create_questions("[]".to_string()).await;
        println!("提交结果: {:?}", result);
    }
}
