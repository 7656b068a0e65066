//! Music Engine Port - 上游音乐生成服务抽象
//!
//! 定义生成任务的发起与状态查询接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::GenerationRequest;

/// 上游服务错误
///
/// 只描述单次调用的传输/协议层失败；
/// 任务本身的终态（failed、未知状态）由轮询方分类
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    Service(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// 发起生成被上游拒绝（ok != true 或缺少 task_url）
    #[error("Generation rejected: {detail}")]
    Rejected { detail: String, response: Value },
}

/// 任务句柄
///
/// 由发起调用产生，被轮询方消费一次。
/// 凭证保存在客户端配置中，不随句柄传递。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    pub task_url: String,
}

/// 上游任务状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Processing,
    Done,
    Failed,
    /// 词表之外的状态，原样保留用于诊断
    Other(String),
}

impl TaskStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pending" => Self::Pending,
            "processing" => Self::Processing,
            "done" => Self::Done,
            "failed" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }

    /// 是否仍在执行中（需要继续轮询）
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Done => "done",
            Self::Failed => "failed",
            Self::Other(s) => s,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 单次轮询观察到的任务快照
#[derive(Debug, Clone)]
pub struct TaskSnapshot {
    pub status: TaskStatus,
    pub ok: Option<bool>,
    /// 完整响应体：终态时即结果载荷，失败时用于诊断
    pub body: Value,
}

impl TaskSnapshot {
    /// 从响应体提取状态字段
    ///
    /// status 缺失或非字符串时归入 Other("")，由轮询方按未知状态终止
    pub fn from_body(body: Value) -> Self {
        let status = body
            .get("status")
            .and_then(Value::as_str)
            .map(TaskStatus::parse)
            .unwrap_or_else(|| TaskStatus::Other(String::new()));
        let ok = body.get("ok").and_then(Value::as_bool);
        Self { status, ok, body }
    }
}

/// Music Engine Port
///
/// 上游音乐生成服务的抽象接口
#[async_trait]
pub trait MusicEnginePort: Send + Sync {
    /// 发起生成任务，成功返回任务句柄
    async fn start_generation(
        &self,
        request: &GenerationRequest,
    ) -> Result<TaskHandle, EngineError>;

    /// 查询任务当前状态
    async fn fetch_task(&self, handle: &TaskHandle) -> Result<TaskSnapshot, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_parse_known_vocabulary() {
        assert_eq!(TaskStatus::parse("pending"), TaskStatus::Pending);
        assert_eq!(TaskStatus::parse("processing"), TaskStatus::Processing);
        assert_eq!(TaskStatus::parse("done"), TaskStatus::Done);
        assert_eq!(TaskStatus::parse("failed"), TaskStatus::Failed);
    }

    #[test]
    fn test_status_parse_preserves_unknown_strings() {
        assert_eq!(
            TaskStatus::parse("exploded"),
            TaskStatus::Other("exploded".to_string())
        );
        // 大小写敏感：词表之外的大写也是未知状态
        assert_eq!(
            TaskStatus::parse("Done"),
            TaskStatus::Other("Done".to_string())
        );
    }

    #[test]
    fn test_in_flight_states() {
        assert!(TaskStatus::Pending.is_in_flight());
        assert!(TaskStatus::Processing.is_in_flight());
        assert!(!TaskStatus::Done.is_in_flight());
        assert!(!TaskStatus::Failed.is_in_flight());
        assert!(!TaskStatus::Other("x".to_string()).is_in_flight());
    }

    #[test]
    fn test_snapshot_from_body() {
        let snapshot = TaskSnapshot::from_body(json!({
            "ok": true,
            "status": "processing",
            "progress": 40
        }));
        assert_eq!(snapshot.status, TaskStatus::Processing);
        assert_eq!(snapshot.ok, Some(true));
        assert_eq!(snapshot.body["progress"], json!(40));
    }

    #[test]
    fn test_snapshot_missing_status_is_unknown() {
        let snapshot = TaskSnapshot::from_body(json!({ "ok": true }));
        assert_eq!(snapshot.status, TaskStatus::Other(String::new()));
    }

    #[test]
    fn test_snapshot_non_boolean_ok_is_absent() {
        let snapshot = TaskSnapshot::from_body(json!({ "ok": "nope", "status": "pending" }));
        assert_eq!(snapshot.ok, None);
    }
}
