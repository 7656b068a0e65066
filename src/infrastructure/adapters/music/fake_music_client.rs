//! Fake Music Client - 用于测试的上游客户端
//!
//! 按预设脚本逐次返回任务快照或传输错误，不访问网络。
//! 脚本耗尽后固定返回 pending，用于验证预算耗尽路径。

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::application::ports::{EngineError, MusicEnginePort, TaskHandle, TaskSnapshot};
use crate::domain::GenerationRequest;

/// 单次轮询的脚本步骤
#[derive(Debug)]
enum FakeStep {
    /// 返回该响应体
    Body(Value),
    /// 返回传输层错误（瞬时失败）
    Transport,
}

/// Fake Music Client
pub struct FakeMusicClient {
    /// 预设的发起拒绝响应；None 表示正常返回句柄
    start_rejection: Mutex<Option<Value>>,
    /// 轮询脚本，逐次消费
    script: Mutex<VecDeque<FakeStep>>,
    /// fetch_task 调用计数
    fetches: AtomicU32,
}

impl FakeMusicClient {
    pub fn new() -> Self {
        Self {
            start_rejection: Mutex::new(None),
            script: Mutex::new(VecDeque::new()),
            fetches: AtomicU32::new(0),
        }
    }

    /// 预设发起调用被拒绝
    pub fn reject_start(&self, response: Value) {
        *self.start_rejection.lock().unwrap() = Some(response);
    }

    /// 追加一个响应体步骤
    pub fn push_body(&self, body: Value) {
        self.script.lock().unwrap().push_back(FakeStep::Body(body));
    }

    /// 追加一个传输错误步骤
    pub fn push_transport_error(&self) {
        self.script.lock().unwrap().push_back(FakeStep::Transport);
    }

    /// fetch_task 被调用的次数
    pub fn fetch_count(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Default for FakeMusicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MusicEnginePort for FakeMusicClient {
    async fn start_generation(
        &self,
        _request: &GenerationRequest,
    ) -> Result<TaskHandle, EngineError> {
        if let Some(response) = self.start_rejection.lock().unwrap().take() {
            return Err(EngineError::Rejected {
                detail: "generation rejected by fake".to_string(),
                response,
            });
        }
        Ok(TaskHandle {
            task_url: "http://fake.local/task/1".to_string(),
        })
    }

    async fn fetch_task(&self, _handle: &TaskHandle) -> Result<TaskSnapshot, EngineError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(FakeStep::Body(body)) => Ok(TaskSnapshot::from_body(body)),
            Some(FakeStep::Transport) => Err(EngineError::Network("connection reset".to_string())),
            // 脚本耗尽：任务永远停留在 pending
            None => Ok(TaskSnapshot::from_body(json!({ "ok": true, "status": "pending" }))),
        }
    }
}
