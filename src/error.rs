use std::fmt;

use serde::{Deserialize, Serialize};
use skillpilot_shared::protocol::ApiDetail;

// =========================================================
// 错误类别枚举
// =========================================================

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppErrorKind {
    /// 请求未能到达服务端（连接失败、CORS、DNS 等）
    Network,
    /// 401: 令牌无效或已过期，会话已被清除
    Unauthorized,
    /// 非 2xx 状态码（仅在严格校验状态码的端点上出现）
    Http,
    /// 响应体不是预期的 JSON
    Parse,
    /// 请求体序列化失败
    Serialization,
    /// 服务端返回了 `{"detail": ...}` 错误载荷
    Api,
    /// 本地存储读写失败
    Storage,
    /// 表单输入未通过本地校验，请求未发出
    InvalidInput,
}

impl AppErrorKind {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppErrorKind::Network => "NETWORK_ERROR",
            AppErrorKind::Unauthorized => "UNAUTHORIZED",
            AppErrorKind::Http => "HTTP_STATUS",
            AppErrorKind::Parse => "RESPONSE_PARSE_ERROR",
            AppErrorKind::Serialization => "REQUEST_SERIALIZE_ERROR",
            AppErrorKind::Api => "API_DETAIL",
            AppErrorKind::Storage => "STORAGE_ERROR",
            AppErrorKind::InvalidInput => "INVALID_INPUT",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 错误发生时的操作记录，如 `api.send(/reports/employees)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorSpan {
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

// =========================================================
// 核心错误类型
// =========================================================

/// 客户端错误
///
/// - kind: 错误类别
/// - message: 错误消息（`Api` 类别下为服务端的 detail 文本）
/// - status: 触发错误的 HTTP 状态码（如有）
/// - spans: 结构化的调用追踪栈
#[derive(Debug, Clone, PartialEq)]
pub struct AppError {
    pub kind: AppErrorKind,
    pub message: String,
    pub status: Option<u16>,
    spans: Vec<ErrorSpan>,
}

impl AppError {
    pub fn new(kind: AppErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Network, message)
    }

    pub fn unauthorized() -> Self {
        let mut err = Self::new(AppErrorKind::Unauthorized, "Unauthorized - token may be invalid");
        err.status = Some(401);
        err
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        let mut err = Self::new(AppErrorKind::Http, message);
        err.status = Some(status);
        err
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Parse, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Serialization, message)
    }

    pub fn api(detail: &ApiDetail) -> Self {
        Self::new(AppErrorKind::Api, detail.message())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Storage, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::InvalidInput, message)
    }

    // --- Context builders ---

    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan {
            operation: operation.into(),
            detail: None,
        });
        self
    }

    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan {
            operation: operation.into(),
            detail: Some(detail.into()),
        });
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status
    }

    /// 可直接展示在界面上的文本
    pub fn user_message(&self) -> String {
        match self.kind {
            AppErrorKind::Network => {
                "Cannot connect to server. Please check if backend is running.".to_string()
            }
            AppErrorKind::Unauthorized => "Session expired. Please log in again.".to_string(),
            AppErrorKind::Api | AppErrorKind::InvalidInput if !self.message.is_empty() => {
                self.message.clone()
            }
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == AppErrorKind::Unauthorized
    }

    /// 服务端给出的 detail 文本；其它类别返回 None
    pub fn api_message(&self) -> Option<&str> {
        match self.kind {
            AppErrorKind::Api if !self.message.is_empty() => Some(&self.message),
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;
        if let Some(status) = self.status {
            write!(f, " (HTTP {})", status)?;
        }

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = std::result::Result<T, AppError>;

// =========================================================
// 类型转换实现
// =========================================================

impl From<ApiDetail> for AppError {
    fn from(detail: ApiDetail) -> Self {
        AppError::api(&detail)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status_and_trace() {
        let err = AppError::http(500, "Internal Server Error")
            .in_op_with("api.send", "/reports/employees");

        assert_eq!(
            err.to_string(),
            "[HTTP_STATUS] Internal Server Error (HTTP 500) | trace: api.send(/reports/employees)"
        );
    }

    #[test]
    fn detail_converts_to_api_error() {
        let err: AppError = ApiDetail::new("Please submit your skills first").into();

        assert_eq!(err.kind, AppErrorKind::Api);
        assert_eq!(err.api_message(), Some("Please submit your skills first"));
        assert_eq!(AppError::network("offline").api_message(), None);
    }

    #[test]
    fn user_message_hides_transport_details() {
        let err = AppError::parse("expected value at line 1 column 1");
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");
        assert_eq!(AppError::unauthorized().status_code(), Some(401));
        assert_eq!(
            AppError::network("dns").user_message(),
            "Cannot connect to server. Please check if backend is running."
        );
    }
}
