//! HTTP Music Client - 调用上游音乐生成 API
//!
//! 实现 MusicEnginePort trait，通过 HTTP 调用第三方音乐生成服务
//!
//! 上游 API:
//! POST {base_url}{generate_path}  (Bearer 认证, JSON body = 校验后的请求)
//! Response: {"ok": bool, "task_url": "...", "status": "...", ...}  (JSON)
//!
//! GET {task_url}  (Bearer 认证)
//! Response: {"status": "pending|processing|done|failed", "ok": bool, ...}  (JSON)

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::application::ports::{EngineError, MusicEnginePort, TaskHandle, TaskSnapshot};
use crate::domain::GenerationRequest;

/// HTTP Music 客户端配置
#[derive(Debug, Clone)]
pub struct MusicApiConfig {
    /// 上游服务基础 URL
    pub base_url: String,
    /// 发起生成的路径
    pub generate_path: String,
    /// Bearer 凭证
    pub api_key: String,
    /// 单次请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for MusicApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            generate_path: "/v1/generate".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

impl MusicApiConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP Music 客户端
///
/// 通过 HTTP 调用上游音乐生成服务
pub struct HttpMusicClient {
    client: Client,
    config: MusicApiConfig,
}

impl HttpMusicClient {
    /// 创建新的 HTTP Music 客户端
    pub fn new(config: MusicApiConfig) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EngineError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 发起生成的完整 URL
    fn generate_url(&self) -> String {
        format!("{}{}", self.config.base_url, self.config.generate_path)
    }

    /// 传输层错误归类
    fn transport_error(err: reqwest::Error) -> EngineError {
        if err.is_timeout() {
            EngineError::Timeout
        } else if err.is_connect() {
            EngineError::Network(format!("Cannot connect to music service: {}", err))
        } else {
            EngineError::Network(err.to_string())
        }
    }

    /// 读出响应体并解析 JSON
    ///
    /// 上游在响应体里报告业务结果，HTTP 状态码只在响应体无法解释时使用
    async fn read_json(response: reqwest::Response, what: &str) -> Result<Value, EngineError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| EngineError::InvalidResponse(format!("Failed to read body: {}", e)))?;

        match serde_json::from_str(&text) {
            Ok(body) => Ok(body),
            Err(_) if !status.is_success() => {
                Err(EngineError::Service(format!("HTTP {}: {}", status, text)))
            }
            Err(e) => Err(EngineError::InvalidResponse(format!(
                "{} is not JSON: {}",
                what, e
            ))),
        }
    }
}

#[async_trait]
impl MusicEnginePort for HttpMusicClient {
    async fn start_generation(
        &self,
        request: &GenerationRequest,
    ) -> Result<TaskHandle, EngineError> {
        tracing::debug!(url = %self.generate_url(), "Sending generation request");

        let response = self
            .client
            .post(self.generate_url())
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(Self::transport_error)?;

        let body = Self::read_json(response, "init response").await?;

        let ok = body.get("ok").and_then(Value::as_bool).unwrap_or(false);
        let task_url = body.get("task_url").and_then(Value::as_str);

        tracing::debug!(ok, status = ?body.get("status"), "Init response received");

        match task_url {
            Some(url) if ok => Ok(TaskHandle {
                task_url: url.to_string(),
            }),
            _ => {
                let detail = body
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("service did not return ok=true with a task_url")
                    .to_string();
                Err(EngineError::Rejected {
                    detail,
                    response: body,
                })
            }
        }
    }

    async fn fetch_task(&self, handle: &TaskHandle) -> Result<TaskSnapshot, EngineError> {
        let response = self
            .client
            .get(&handle.task_url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(Self::transport_error)?;

        let body = Self::read_json(response, "task response").await?;
        Ok(TaskSnapshot::from_body(body))
    }
}
