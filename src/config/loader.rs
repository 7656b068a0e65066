//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `ARIOSO_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `ARIOSO_SERVER__PORT=8080`
/// - `ARIOSO_ENGINE__BASE_URL=https://music-api.example.com`
/// - `ARIOSO_ENGINE__API_KEY=sk-xxxx`
/// - `ARIOSO_ENGINE__CREATOR_NAME="Arioso Bot"`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5070)?
        .set_default("engine.base_url", "http://localhost:8000")?
        .set_default("engine.generate_path", "/v1/generate")?
        .set_default("engine.api_key", "")?
        .set_default("engine.creator_name", "")?
        .set_default("engine.timeout_secs", 30)?
        .set_default("poller.interval_secs", 5)?
        .set_default("poller.max_attempts", 60)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: ARIOSO_
    // 层级分隔符: __ (双下划线)
    // 例如: ARIOSO_ENGINE__API_KEY=sk-xxxx
    builder = builder.add_source(
        Environment::with_prefix("ARIOSO")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
///
/// 凭证与署名是必填项：原实现对每个请求返回 500，这里改为启动即失败
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    // 验证端口范围
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    // 验证上游服务地址
    if config.engine.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Engine base URL cannot be empty".to_string(),
        ));
    }
    if !config.engine.generate_path.starts_with('/') {
        return Err(ConfigError::ValidationError(
            "Engine generate path must start with '/'".to_string(),
        ));
    }

    // 验证凭证与署名
    if config.engine.api_key.is_empty() {
        return Err(ConfigError::ValidationError(
            "Engine API key is required (set ARIOSO_ENGINE__API_KEY)".to_string(),
        ));
    }
    if config.engine.creator_name.is_empty() {
        return Err(ConfigError::ValidationError(
            "Creator name is required (set ARIOSO_ENGINE__CREATOR_NAME)".to_string(),
        ));
    }

    // 验证轮询参数
    if config.poller.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Poll interval cannot be 0".to_string(),
        ));
    }
    if config.poller.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "Poll max attempts cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
///
/// 凭证不打印内容，只打印是否设置
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Engine URL: {}", config.engine.generate_url());
    tracing::info!("Engine Timeout: {}s", config.engine.timeout_secs);
    tracing::info!(
        "Engine API Key: {}",
        if config.engine.api_key.is_empty() {
            "<not set>"
        } else {
            "<set>"
        }
    );
    tracing::info!("Creator Name: {}", config.engine.creator_name);
    tracing::info!("Poll Interval: {}s", config.poller.interval_secs);
    tracing::info!("Poll Max Attempts: {}", config.poller.max_attempts);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.engine.api_key = "sk-test".to_string();
        config.engine.creator_name = "Arioso Bot".to_string();
        config
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_default_config_is_missing_credentials() {
        // 默认配置没有凭证，必须显式配置后才能启动
        let config = AppConfig::default();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = valid_config();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_base_url() {
        let mut config = valid_config();
        config.engine.base_url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_relative_generate_path() {
        let mut config = valid_config();
        config.engine.generate_path = "v1/generate".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_missing_creator_name() {
        let mut config = valid_config();
        config.engine.creator_name = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_interval() {
        let mut config = valid_config();
        config.poller.interval_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_attempts() {
        let mut config = valid_config();
        config.poller.max_attempts = 0;
        assert!(validate_config(&config).is_err());
    }
}
