//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod music_engine;

pub use music_engine::{EngineError, MusicEnginePort, TaskHandle, TaskSnapshot, TaskStatus};
