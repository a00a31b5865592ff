use std::fmt;

use serde::{Deserialize, Serialize};

// =========================================================
// 错误状态枚举
// =========================================================

/// 错误状态枚举
/// 包含错误对应的语义（状态码）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateErrorStatus {
    /// 400: 无法读取请求（如非法的请求头）
    InvalidRequest,
    /// 502: 转发到源站失败
    Upstream,
    /// 500: 其他运行时错误
    Internal,
}

impl GateErrorStatus {
    pub fn status_code(&self) -> u16 {
        match self {
            GateErrorStatus::InvalidRequest => 400,
            GateErrorStatus::Upstream => 502,
            GateErrorStatus::Internal => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            GateErrorStatus::InvalidRequest => "INVALID_REQUEST",
            GateErrorStatus::Upstream => "UPSTREAM_ERROR",
            GateErrorStatus::Internal => "INTERNAL_ERROR",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorSpan {
    /// 操作名称，如 "request.cookie", "origin.forward"
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 边缘网关错误
///
/// - status: 错误类型/语义
/// - message: 错误消息
/// - spans: 调用追踪栈
#[derive(Debug)]
pub struct GateError {
    pub status: GateErrorStatus,
    pub message: String,
    spans: Vec<ErrorSpan>,
}

impl GateError {
    pub fn new(status: GateErrorStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            spans: Vec::new(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(GateErrorStatus::InvalidRequest, message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(GateErrorStatus::Upstream, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(GateErrorStatus::Internal, message)
    }

    // --- Context builders ---

    /// 添加操作追踪（无额外细节）
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    /// 添加操作追踪（带额外细节）
    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    // --- Accessors ---

    pub fn status_code(&self) -> u16 {
        self.status.status_code()
    }

    pub fn error_code(&self) -> &'static str {
        self.status.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

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

impl std::error::Error for GateError {}

/// 4xx 响应体
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub code: &'static str,
    pub message: &'a str,
    #[serde(skip_serializing_if = "no_spans")]
    pub trace: &'a [ErrorSpan],
}

fn no_spans(spans: &&[ErrorSpan]) -> bool {
    spans.is_empty()
}

impl GateError {
    pub fn body(&self) -> ErrorBody<'_> {
        ErrorBody {
            code: self.error_code(),
            message: &self.message,
            trace: &self.spans,
        }
    }
}

pub type GateResult<T> = std::result::Result<T, GateError>;

impl From<worker::Error> for GateError {
    fn from(e: worker::Error) -> Self {
        GateError::internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(GateError::invalid_request("x").status_code(), 400);
        assert_eq!(GateError::upstream("x").status_code(), 502);
        assert_eq!(GateError::internal("x").status_code(), 500);
    }

    #[test]
    fn test_display_includes_trace() {
        let err = GateError::upstream("connection reset")
            .in_op_with("origin.forward", "/dashboard")
            .in_op("gate.handle");
        assert_eq!(
            err.to_string(),
            "[UPSTREAM_ERROR] connection reset | trace: origin.forward(/dashboard) -> gate.handle"
        );
        assert_eq!(err.spans().len(), 2);
    }

    #[test]
    fn test_body_serializes_trace() {
        let err = GateError::invalid_request("bad cookie header").in_op("request.cookie");
        let json = serde_json::to_value(err.body()).unwrap();
        assert_eq!(json["code"], "INVALID_REQUEST");
        assert_eq!(json["message"], "bad cookie header");
        assert_eq!(json["trace"][0]["operation"], "request.cookie");
        assert!(json["trace"][0].get("detail").is_none());

        let bare = serde_json::to_value(GateError::invalid_request("x").body()).unwrap();
        assert!(bare.get("trace").is_none());
    }
}
