//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（MusicEngine）
//! - commands: 生成命令及处理器
//! - poller: 任务状态轮询状态机
//! - error: 生成错误分类

pub mod commands;
pub mod error;
pub mod poller;
pub mod ports;

// Re-exports
pub use commands::{handlers::GenerateMusicHandler, GenerateMusicCommand, GenerateMusicResponse};
pub use error::GenerationError;
pub use poller::{PollerConfig, TaskPoller};
pub use ports::{EngineError, MusicEnginePort, TaskHandle, TaskSnapshot, TaskStatus};
