use std::sync::Arc;

pub use skillpilot_shared::protocol::HttpMethod;

use crate::error::{AppError, AppResult};

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    /// 按名称查找请求头（大小写不敏感）
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP 客户端特性
///
/// 浏览器 fetch 的 future 不是 Send 的，所以使用 `?Send`；
/// 客户端本身需要放进 Leptos 上下文，因此要求 `Send + Sync`。
#[async_trait::async_trait(?Send)]
pub trait HttpClient: Send + Sync {
    async fn send(&self, req: HttpRequest) -> AppResult<HttpResponse>;
}

// =========================================================
// 实现层: 浏览器 fetch 客户端 (Production)
// =========================================================

#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Default)]
pub struct FetchHttpClient;

#[cfg(target_arch = "wasm32")]
#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> AppResult<HttpResponse> {
        use gloo_net::http::Request;

        let mut builder = match req.method {
            HttpMethod::Get => Request::get(&req.url),
            HttpMethod::Post => Request::post(&req.url),
            HttpMethod::Put => Request::put(&req.url),
            HttpMethod::Delete => Request::delete(&req.url),
        };

        for (k, v) in &req.headers {
            builder = builder.header(k, v);
        }

        let request = match req.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| AppError::network(e.to_string()).in_op_with("fetch.build", &req.url))?;

        let response = request
            .send()
            .await
            .map_err(|e| AppError::network(e.to_string()).in_op_with("fetch.send", &req.url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::network(e.to_string()).in_op_with("fetch.body", &req.url))?;

        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// 实现层: Reqwest 客户端 (Native)
// =========================================================

#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

#[cfg(not(target_arch = "wasm32"))]
impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait::async_trait(?Send)]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, req: HttpRequest) -> AppResult<HttpResponse> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &req.url);

        for (k, v) in &req.headers {
            builder = builder.header(k.as_str(), v.as_str());
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let resp = builder.send().await.map_err(|e| {
            AppError::network(format!("Reqwest Error: {}", e)).in_op_with("reqwest.send", &req.url)
        })?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| {
            AppError::network(format!("Reqwest Body Error: {}", e))
                .in_op_with("reqwest.body", &req.url)
        })?;

        Ok(HttpResponse { status, body })
    }
}

/// 当前平台的默认 HTTP 客户端
#[cfg(target_arch = "wasm32")]
pub fn default_http_client() -> Arc<dyn HttpClient> {
    Arc::new(FetchHttpClient)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn default_http_client() -> Arc<dyn HttpClient> {
    Arc::new(ReqwestHttpClient::new())
}

// =========================================================
// 测试环境实现 (MockHttpClient)
// =========================================================

#[cfg(test)]
pub use mock::{MockHttpClient, MockReply};


#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest::new("http://localhost/api", HttpMethod::Get)
            .with_header("Content-Type", "application/json");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("Authorization"), None);
    }

    #[tokio::test]
    async fn reqwest_client_returns_status_and_body() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let head = String::from_utf8_lossy(&buf[..n]).to_string();

            let body = r#"{"detail":"Not authenticated"}"#;
            let resp = format!(
                "HTTP/1.1 401 Unauthorized\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(resp.as_bytes()).await.unwrap();
            head
        });

        let client = ReqwestHttpClient::new();
        let req = HttpRequest::new(&format!("http://{}/api/quiz/results", addr), HttpMethod::Get)
            .with_header("Authorization", "Bearer abc");
        let resp = client.send(req).await.unwrap();

        assert_eq!(resp.status, 401);
        assert_eq!(resp.body, r#"{"detail":"Not authenticated"}"#);
        assert!(!resp.is_success());

        let head = server.await.unwrap();
        assert!(head.starts_with("GET /api/quiz/results"));
        assert!(head.to_ascii_lowercase().contains("authorization: bearer abc"));
    }

    #[tokio::test]
    async fn reqwest_client_maps_refused_connection_to_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ReqwestHttpClient::new();
        let err = client
            .send(HttpRequest::new(&format!("http://{}/api", addr), HttpMethod::Get))
            .await
            .unwrap_err();

        assert_eq!(err.kind, crate::error::AppErrorKind::Network);
    }
}
