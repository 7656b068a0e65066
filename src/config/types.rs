//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 上游音乐生成服务配置
    #[serde(default)]
    pub engine: EngineConfig,

    /// 轮询配置
    #[serde(default)]
    pub poller: PollerSettings,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            engine: EngineConfig::default(),
            poller: PollerSettings::default(),
            log: LogConfig::default(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5070
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 上游音乐生成服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// 上游服务基础 URL
    #[serde(default = "default_engine_base_url")]
    pub base_url: String,

    /// 发起生成的路径
    #[serde(default = "default_generate_path")]
    pub generate_path: String,

    /// Bearer 凭证（必填，启动时校验）
    #[serde(default)]
    pub api_key: String,

    /// 署名字段，合并进最终响应（必填，启动时校验）
    #[serde(default)]
    pub creator_name: String,

    /// 单次上游请求超时时间（秒）
    #[serde(default = "default_engine_timeout")]
    pub timeout_secs: u64,
}

fn default_engine_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_generate_path() -> String {
    "/v1/generate".to_string()
}

fn default_engine_timeout() -> u64 {
    30
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: default_engine_base_url(),
            generate_path: default_generate_path(),
            api_key: String::new(),
            creator_name: String::new(),
            timeout_secs: default_engine_timeout(),
        }
    }
}

impl EngineConfig {
    /// 发起生成的完整 URL
    pub fn generate_url(&self) -> String {
        format!("{}{}", self.base_url, self.generate_path)
    }
}

/// 轮询配置
///
/// 固定间隔、固定预算；预算只为限制调用方可见的最坏时延
#[derive(Debug, Clone, Deserialize)]
pub struct PollerSettings {
    /// 两次查询之间的固定间隔（秒）
    #[serde(default = "default_poll_interval")]
    pub interval_secs: u64,

    /// 最大尝试次数
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_poll_interval() -> u64 {
    5
}

fn default_max_attempts() -> u32 {
    60
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval(),
            max_attempts: default_max_attempts(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
