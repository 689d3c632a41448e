// admin-client/src/client/http_oneshot.rs
// Oneshot HTTP 客户端 - 内存通信 (测试 / 嵌入式 mock API)

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Method, Request, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use crate::{ClientError, ClientResult};

use super::http::{HttpClient, status_error};

/// Oneshot HTTP 客户端 (内存调用)
///
/// 使用 Tower Service 的 oneshot 模式直接调用 Router，
/// 适用于同进程的服务器-客户端通信，零网络开销。
/// Dropping an in-flight call drops the handler future with it,
/// the same way an aborted network request does.
///
/// # Example
///
/// ```ignore
/// use axum::Router;
/// use admin_client::OneshotHttpClient;
///
/// let router: Router = mock_api();
/// let client = OneshotHttpClient::new(router);
///
/// let page: PagedData<User> = client.get("/users?search=ann").await?;
/// ```
#[derive(Debug, Clone)]
pub struct OneshotHttpClient {
    router: Router,
    token: Option<String>,
}

impl OneshotHttpClient {
    /// 创建新的 Oneshot HTTP 客户端
    ///
    /// # Arguments
    /// * `router` - 已初始化的 Axum Router (with_state 已调用)
    pub fn new(router: Router) -> Self {
        Self {
            router,
            token: None,
        }
    }

    /// 设置认证 token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn uri(path: &str) -> String {
        format!("/{}", path.trim_start_matches('/'))
    }

    /// 构建请求
    fn build_request(&self, method: Method, path: &str, body: Body) -> ClientResult<Request<Body>> {
        let mut builder = Request::builder().method(method).uri(Self::uri(path));

        if let Some(token) = &self.token {
            builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {}", token));
        }

        builder
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(body)
            .map_err(|e| ClientError::Internal(format!("Failed to build request: {}", e)))
    }

    /// 执行请求，返回状态码和 body
    async fn execute(&self, request: Request<Body>) -> ClientResult<Response<Body>> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| ClientError::Internal(format!("Oneshot call failed: {}", e)))
    }

    async fn read_body(response: Response<Body>) -> ClientResult<(http::StatusCode, Vec<u8>)> {
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::Internal(format!("Failed to read body: {}", e)))?;
        Ok((status, body_bytes.to_vec()))
    }

    async fn execute_json<T: DeserializeOwned>(&self, request: Request<Body>) -> ClientResult<T> {
        let response = self.execute(request).await?;
        let (status, body) = Self::read_body(response).await?;

        if !status.is_success() {
            return Err(status_error(status, String::from_utf8_lossy(&body).to_string()));
        }

        serde_json::from_slice(&body)
            .map_err(|e| ClientError::InvalidResponse(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl HttpClient for OneshotHttpClient {
    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> ClientResult<T> {
        let request = self.build_request(Method::GET, path, Body::empty())?;
        self.execute_json(request).await
    }

    async fn patch<T: DeserializeOwned + Send, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body_bytes = serde_json::to_vec(body)?;
        let request = self.build_request(Method::PATCH, path, Body::from(body_bytes))?;
        self.execute_json(request).await
    }

    async fn delete(&self, path: &str) -> ClientResult<()> {
        let request = self.build_request(Method::DELETE, path, Body::empty())?;
        let response = self.execute(request).await?;
        let (status, body) = Self::read_body(response).await?;
        if !status.is_success() {
            return Err(status_error(status, String::from_utf8_lossy(&body).to_string()));
        }
        Ok(())
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::routing::get;

    #[tokio::test]
    async fn test_oneshot_get_json() {
        let router = Router::new().route("/ping", get(|| async { Json(vec![1, 2, 3]) }));
        let client = OneshotHttpClient::new(router);
        let body: Vec<u32> = client.get("ping").await.unwrap();
        assert_eq!(body, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_oneshot_missing_route_is_not_found() {
        let client = OneshotHttpClient::new(Router::new());
        let err = client.delete("/users/u1").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }
}
