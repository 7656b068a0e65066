//! Task Poller - 任务状态轮询
//!
//! 固定间隔、固定预算的轮询状态机。不做指数退避：
//! 上游任务的完成时延分布大致已知，常数间隔的有界循环更易推理与测试。

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::application::error::GenerationError;
use crate::application::ports::{MusicEnginePort, TaskHandle, TaskSnapshot, TaskStatus};

/// 轮询配置
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// 两次查询之间的固定间隔
    pub interval: Duration,
    /// 最大尝试次数；执行中查询与瞬时失败共用同一预算
    pub max_attempts: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 60,
        }
    }
}

/// 任务轮询器
///
/// 每个生成请求独占一个轮询循环，循环内只持有尝试计数与单个在途查询。
pub struct TaskPoller {
    engine: Arc<dyn MusicEnginePort>,
    config: PollerConfig,
}

impl TaskPoller {
    pub fn new(engine: Arc<dyn MusicEnginePort>, config: PollerConfig) -> Self {
        Self { engine, config }
    }

    /// 轮询任务直到终态或预算耗尽
    ///
    /// 终态分类:
    /// - done -> 返回完整任务载荷（不做变换）
    /// - failed，或非执行中状态下 ok == false -> GenerationFailed
    /// - 词表之外的状态 -> UnknownStatus
    /// - 传输/解析失败 -> 瞬时，消耗一次预算后继续
    /// - 预算耗尽 -> PollingTimeout
    ///
    /// 等待用普通的 `tokio::time::sleep`，future 被丢弃即取消，
    /// 调用方中止只需在外层 select 即可，无须改动循环结构。
    pub async fn poll(&self, handle: &TaskHandle) -> Result<Value, GenerationError> {
        for attempt in 1..=self.config.max_attempts {
            match self.engine.fetch_task(handle).await {
                Ok(TaskSnapshot { status, ok, body }) => {
                    // ok == false 且不在执行中：确认失败，先于状态词表判定
                    if ok == Some(false) && !status.is_in_flight() {
                        tracing::warn!(attempt, status = %status, "task reported ok=false");
                        return Err(GenerationError::GenerationFailed {
                            status: status.to_string(),
                            task: body,
                        });
                    }

                    match status {
                        TaskStatus::Done => {
                            tracing::info!(attempt, "generation task completed");
                            return Ok(body);
                        }
                        TaskStatus::Failed => {
                            tracing::warn!(attempt, "generation task failed");
                            return Err(GenerationError::GenerationFailed {
                                status: status.to_string(),
                                task: body,
                            });
                        }
                        TaskStatus::Other(status) => {
                            tracing::warn!(attempt, status = %status, "task reported unknown status");
                            return Err(GenerationError::UnknownStatus { status, task: body });
                        }
                        TaskStatus::Pending | TaskStatus::Processing => {
                            tracing::debug!(
                                attempt,
                                max_attempts = self.config.max_attempts,
                                status = %status,
                                "task still in flight"
                            );
                        }
                    }
                }
                Err(err) => {
                    // 单次查询失败不终止任务，只消耗预算
                    tracing::warn!(attempt, error = %err, "poll attempt failed, retrying");
                }
            }

            if attempt < self.config.max_attempts {
                tokio::time::sleep(self.config.interval).await;
            }
        }

        Err(GenerationError::PollingTimeout {
            attempts: self.config.max_attempts,
        })
    }
}
