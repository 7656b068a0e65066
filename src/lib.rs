//! Arioso - 音乐生成编排服务
//!
//! 接收生成请求，校验后转发给第三方音乐生成 API，
//! 轮询其异步任务端点直到终态，向调用方返回归一化结果。
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Generation Context: 生成请求载荷与双模式校验规则
//!
//! 应用层 (application/):
//! - Ports: 出站端口定义（MusicEngine）
//! - Commands: 生成命令及处理器
//! - Poller: 有界重试的任务状态轮询状态机
//! - Error: 生成错误分类（分类即控制流）
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API（axum），错误分类到响应码的映射
//! - Adapters: 上游音乐生成服务客户端（reqwest）与测试用 Fake

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
