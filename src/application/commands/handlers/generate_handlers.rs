//! Generation Command Handlers

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::application::commands::generate_commands::{
    GenerateMusicCommand, GenerateMusicResponse,
};
use crate::application::error::GenerationError;
use crate::application::poller::{PollerConfig, TaskPoller};
use crate::application::ports::{EngineError, MusicEnginePort};
use crate::domain::generation::validate;

/// GenerateMusic Handler - 校验、发起并跟踪一次生成
///
/// 流程: validate（提前拒绝）-> start_generation -> poll -> 合并署名字段
pub struct GenerateMusicHandler {
    engine: Arc<dyn MusicEnginePort>,
    poller: TaskPoller,
    creator_name: String,
}

impl GenerateMusicHandler {
    pub fn new(
        engine: Arc<dyn MusicEnginePort>,
        poller_config: PollerConfig,
        creator_name: impl Into<String>,
    ) -> Self {
        Self {
            poller: TaskPoller::new(engine.clone(), poller_config),
            engine,
            creator_name: creator_name.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: GenerateMusicCommand,
    ) -> Result<GenerateMusicResponse, GenerationError> {
        let mut request = cmd.request;

        // 校验失败提前拒绝，所有违反项一次返回
        let report = validate(&mut request);
        if !report.valid {
            tracing::warn!(errors = ?report.errors, "generation request rejected");
            return Err(GenerationError::Validation(report.errors));
        }

        tracing::info!(
            custom_mode = request.is_custom(),
            instrumental = request.wants_instrumental(),
            "input validation passed, initiating generation"
        );

        // 发起失败不重试，也不进入轮询
        let handle = self
            .engine
            .start_generation(&request)
            .await
            .map_err(|err| match err {
                EngineError::Rejected { detail, response } => GenerationError::Initiation {
                    detail,
                    response: Some(response),
                },
                other => GenerationError::Initiation {
                    detail: other.to_string(),
                    response: None,
                },
            })?;

        tracing::info!(task_url = %handle.task_url, "generation started, polling task status");

        let task = self.poller.poll(&handle).await?;

        Ok(GenerateMusicResponse {
            task: self.finalize(task),
        })
    }

    /// 在终态载荷上合并署名与完成时间
    fn finalize(&self, mut task: Value) -> Value {
        if let Some(fields) = task.as_object_mut() {
            fields.insert(
                "creator".to_string(),
                Value::String(self.creator_name.clone()),
            );
            fields.insert(
                "completed_at".to_string(),
                Value::String(Utc::now().to_rfc3339()),
            );
        }
        task
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::FakeMusicClient;
    use serde_json::json;
    use std::time::Duration;

    fn handler(engine: Arc<FakeMusicClient>) -> GenerateMusicHandler {
        GenerateMusicHandler::new(
            engine,
            PollerConfig {
                interval: Duration::from_millis(10),
                max_attempts: 3,
            },
            "Arioso Bot",
        )
    }

    fn command(body: serde_json::Value) -> GenerateMusicCommand {
        GenerateMusicCommand {
            request: serde_json::from_value(body).unwrap(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_generation_merges_attribution() {
        let engine = Arc::new(FakeMusicClient::new());
        engine.push_body(json!({ "ok": true, "status": "done", "audio_url": "http://a/b.mp3" }));

        let response = handler(engine)
            .handle(command(json!({
                "customMode": false,
                "instrumental": false,
                "prompt": "a song about rain"
            })))
            .await
            .unwrap();

        assert_eq!(response.task["audio_url"], json!("http://a/b.mp3"));
        assert_eq!(response.task["creator"], json!("Arioso Bot"));
        assert!(response.task["completed_at"].is_string());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_request_never_reaches_engine() {
        let engine = Arc::new(FakeMusicClient::new());

        let err = handler(engine.clone())
            .handle(command(json!({ "customMode": true, "instrumental": false })))
            .await
            .unwrap_err();

        match err {
            GenerationError::Validation(errors) => assert!(!errors.is_empty()),
            other => panic!("expected Validation, got {:?}", other),
        }
        assert_eq!(engine.fetch_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_start_is_initiation_error() {
        let engine = Arc::new(FakeMusicClient::new());
        engine.reject_start(json!({ "ok": false, "message": "quota exceeded" }));

        let err = handler(engine.clone())
            .handle(command(json!({
                "customMode": false,
                "instrumental": false,
                "prompt": "x"
            })))
            .await
            .unwrap_err();

        match err {
            GenerationError::Initiation { response, .. } => {
                assert_eq!(response.unwrap()["message"], json!("quota exceeded"));
            }
            other => panic!("expected Initiation, got {:?}", other),
        }
        // 发起失败不进入轮询
        assert_eq!(engine.fetch_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_timeout_propagates() {
        let engine = Arc::new(FakeMusicClient::new());

        let err = handler(engine)
            .handle(command(json!({
                "customMode": false,
                "instrumental": false,
                "prompt": "x"
            })))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::PollingTimeout { attempts: 3 }));
    }
}
