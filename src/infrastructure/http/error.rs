//! HTTP Error Handling
//!
//! 错误分类到响应码的映射:
//! - 校验失败 / 请求体缺失 -> 400
//! - 发起失败 / 生成失败 / 未知状态 -> 502
//! - 轮询超时 -> 504
//! - 其他内部错误 -> 500

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::application::GenerationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            status: None,
            details: None,
        }
    }

    fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    /// 请求体缺失或不是 JSON 对象
    BadRequest(String),
    /// 校验失败，携带全部违反项
    Validation(Vec<String>),
    /// 上游拒绝发起任务
    Initiation {
        detail: String,
        response: Option<Value>,
    },
    /// 任务失败终态
    GenerationFailed { status: String, task: Value },
    /// 任务报告未知状态
    UnknownStatus { status: String, task: Value },
    /// 轮询预算耗尽
    Timeout { attempts: u32 },
    /// 其他内部错误
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, response) = match self {
            ApiError::BadRequest(message) => {
                tracing::warn!(error = %message, "Bad request");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("Bad Request").with_message(message),
                )
            }
            ApiError::Validation(errors) => {
                tracing::warn!(?errors, "Validation failed");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("Validation Failed").with_details(json!(errors)),
                )
            }
            ApiError::Initiation { detail, response } => {
                tracing::error!(error = %detail, "Failed to start generation");
                let mut body =
                    ErrorResponse::new("Failed to start generation").with_message(detail);
                if let Some(response) = response {
                    body = body.with_details(response);
                }
                (StatusCode::BAD_GATEWAY, body)
            }
            ApiError::GenerationFailed { status, task } => {
                tracing::error!(status = %status, "Generation failed");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse::new("Generation failed")
                        .with_status(status)
                        .with_details(task),
                )
            }
            ApiError::UnknownStatus { status, task } => {
                tracing::error!(status = %status, "Unknown task status");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse::new("Unknown task status")
                        .with_status(status)
                        .with_details(task),
                )
            }
            ApiError::Timeout { attempts } => {
                tracing::error!(attempts, "Polling timeout");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    ErrorResponse::new("Polling timeout").with_message(format!(
                        "task did not reach a terminal state within {} attempts",
                        attempts
                    )),
                )
            }
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal Server Error").with_message(message),
                )
            }
        };

        (code, Json(response)).into_response()
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Validation(errors) => ApiError::Validation(errors),
            GenerationError::Initiation { detail, response } => {
                ApiError::Initiation { detail, response }
            }
            GenerationError::GenerationFailed { status, task } => {
                ApiError::GenerationFailed { status, task }
            }
            GenerationError::UnknownStatus { status, task } => {
                ApiError::UnknownStatus { status, task }
            }
            GenerationError::PollingTimeout { attempts } => ApiError::Timeout { attempts },
            GenerationError::Internal(message) => ApiError::Internal(message),
        }
    }
}
