//! 应用层错误定义
//!
//! 生成流程的统一错误分类。分类即控制流：
//! 边界层只做分类到响应码的映射，不解析错误文本。

use serde_json::Value;
use thiserror::Error;

/// 生成流程错误
#[derive(Debug, Error)]
pub enum GenerationError {
    /// 请求校验失败，调用方修正输入后可重试
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// 上游拒绝或无法发起任务；不重试，也不进入轮询
    #[error("Failed to start generation: {detail}")]
    Initiation {
        detail: String,
        response: Option<Value>,
    },

    /// 任务进入失败终态，或非执行中状态下报告 ok == false
    #[error("Generation failed with status '{status}'")]
    GenerationFailed { status: String, task: Value },

    /// 任务报告了词表之外的状态；未知状态不值得继续轮询，
    /// 与 GenerationFailed 区分以便边界层分开呈现
    #[error("Task reported unknown status '{status}'")]
    UnknownStatus { status: String, task: Value },

    /// 重试预算耗尽时任务仍未到达终态（"可能还会完成"而非"确认失败"）
    #[error("Polling timed out after {attempts} attempts")]
    PollingTimeout { attempts: u32 },

    /// 其他内部错误
    #[error("Internal error: {0}")]
    Internal(String),
}
