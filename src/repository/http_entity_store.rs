// ==========================================
// 批量导入管道 - 内容 API 实体存储实现
// ==========================================
// 协议: POST {base}/api/{collection}，请求体 {"data": payload}
// 成功: 2xx 且响应含 data.id（字符串或数字）
// 失败: 非 2xx 时优先取响应体 error.message，否则使用状态行
// ==========================================

use crate::domain::entity::EntityPayload;
use crate::repository::entity_store::{CreatedRecord, EntityStore};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

pub struct HttpEntityStore {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpEntityStore {
    /// 创建内容 API 客户端
    ///
    /// # 参数
    /// - base_url: 服务根地址（末尾斜杠可有可无）
    /// - api_token: 可选的 Bearer 令牌
    /// - timeout: 单次请求超时
    pub fn new(
        base_url: impl Into<String>,
        api_token: Option<String>,
        timeout: Duration,
    ) -> RepositoryResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.filter(|t| !t.trim().is_empty()),
        })
    }

    fn endpoint(&self, collection: &str) -> String {
        format!("{}/api/{}", self.base_url, collection)
    }
}

/// 从响应体提取 data.id（字符串或数字）
fn extract_id(body: &Value) -> Option<String> {
    match body.get("data")?.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 从错误响应体提取 error.message
fn extract_error_message(body: &Value) -> Option<String> {
    body.get("error")?
        .get("message")?
        .as_str()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl EntityStore for HttpEntityStore {
    async fn create(&self, payload: &EntityPayload) -> RepositoryResult<CreatedRecord> {
        let url = self.endpoint(payload.kind().collection());
        let body = json!({ "data": payload.to_data_json()? });

        let mut request = self.client.post(&url).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        // 非 JSON 响应体按空处理
        let parsed: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        debug!(url = %url, status = %status, "内容 API 响应");

        if !status.is_success() {
            let message = extract_error_message(&parsed).unwrap_or_else(|| status.to_string());
            return Err(RepositoryError::Rejected { message });
        }

        Ok(CreatedRecord {
            id: extract_id(&parsed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{ContactPayload, LeadCompanyPayload};
    use httpmock::prelude::*;

    fn contact() -> EntityPayload {
        EntityPayload::Contact(ContactPayload {
            first_name: Some("Ada".to_string()),
            status: "prospect".to_string(),
            lead_source: "import".to_string(),
            ..Default::default()
        })
    }

    fn store(server: &MockServer, token: Option<&str>) -> HttpEntityStore {
        HttpEntityStore::new(
            server.base_url(),
            token.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_posts_data_envelope_with_bearer_token() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/contacts")
                    .header("authorization", "Bearer secret")
                    .json_body(json!({
                        "data": {
                            "firstName": "Ada",
                            "status": "prospect",
                            "leadSource": "import"
                        }
                    }));
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({ "data": { "id": "c-1" } }));
            })
            .await;

        let created = store(&server, Some("secret")).create(&contact()).await.unwrap();

        api_mock.assert_async().await;
        assert_eq!(created.identifier(), Some("c-1"));
    }

    #[tokio::test]
    async fn test_numeric_id_and_collection_routing() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/lead-companies");
                then.status(201).json_body(json!({ "data": { "id": 17 } }));
            })
            .await;

        let payload = EntityPayload::LeadCompany(LeadCompanyPayload {
            company_name: "Acme".to_string(),
            status: "NEW".to_string(),
            source: "IMPORT".to_string(),
            ..Default::default()
        });
        let created = store(&server, None).create(&payload).await.unwrap();

        api_mock.assert_async().await;
        assert_eq!(created.identifier(), Some("17"));
    }

    #[tokio::test]
    async fn test_success_without_id_yields_empty_record() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/contacts");
                then.status(200).json_body(json!({ "data": {} }));
            })
            .await;

        let created = store(&server, None).create(&contact()).await.unwrap();
        assert_eq!(created.identifier(), None);
    }

    #[tokio::test]
    async fn test_error_message_from_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/contacts");
                then.status(400).json_body(json!({
                    "error": { "status": 400, "message": "This attribute must be unique" }
                }));
            })
            .await;

        let err = store(&server, None).create(&contact()).await.unwrap_err();
        assert_eq!(err.to_string(), "This attribute must be unique");
    }

    #[tokio::test]
    async fn test_error_falls_back_to_status_line() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/contacts");
                then.status(500).body("upstream exploded");
            })
            .await;

        let err = store(&server, None).create(&contact()).await.unwrap_err();
        assert_eq!(err.to_string(), "500 Internal Server Error");
    }
}
