// admin-client/src/client/http.rs
// HTTP 客户端 - 网络通信

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ApiErrorResponse;
use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP 客户端 trait
///
/// The store only needs these three verbs; paths are relative to the
/// client's base URL and may carry a query string.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T>;
    async fn patch<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    /// Any 2xx status is success; the body is ignored
    async fn delete(&self, path: &str) -> ClientResult<()>;
    fn token(&self) -> Option<&str>;
}

/// Map a non-2xx status and its body text to a `ClientError`
pub(crate) fn status_error(status: StatusCode, text: String) -> ClientError {
    // 尝试解析为 API 错误响应
    if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&text) {
        return ClientError::Api {
            code: api_err.code,
            message: api_err.message,
            details: api_err.details,
        };
    }
    // 降级到按状态码处理
    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
        StatusCode::FORBIDDEN => ClientError::Forbidden(text),
        StatusCode::NOT_FOUND => ClientError::NotFound(text),
        StatusCode::BAD_REQUEST => ClientError::Validation(text),
        _ if text.is_empty() => ClientError::Internal(status.to_string()),
        _ => ClientError::Internal(text),
    }
}

/// 网络 HTTP 客户端
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl NetworkHttpClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::from_config(&ClientConfig::new(base_url))
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// 获取基础 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(status_error(status, text));
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::InvalidResponse(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T> {
        let req = self.authorize(self.client.get(self.url(path)));
        tracing::trace!(path, "GET");
        let response = req.send().await?;
        self.handle_response(response).await
    }

    async fn patch<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.authorize(self.client.patch(self.url(path)).json(body));
        tracing::trace!(path, "PATCH");
        let response = req.send().await?;
        self.handle_response(response).await
    }

    async fn delete(&self, path: &str) -> ClientResult<()> {
        let req = self.authorize(self.client.delete(self.url(path)));
        tracing::trace!(path, "DELETE");
        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(status_error(status, text));
        }
        Ok(())
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}
