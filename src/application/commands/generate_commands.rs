//! Generation Commands - 生成相关命令

use serde_json::Value;

use crate::domain::GenerationRequest;

/// 音乐生成命令
#[derive(Debug, Clone)]
pub struct GenerateMusicCommand {
    pub request: GenerationRequest,
}

/// 音乐生成响应
///
/// task 为上游任务的终态载荷，已合并 creator 与 completed_at 字段
#[derive(Debug, Clone)]
pub struct GenerateMusicResponse {
    pub task: Value,
}
