//! Generate Handler - 音乐生成入口
//!
//! POST /api/generate
//!
//! 编排: 校验 -> 发起生成 -> 轮询任务状态 -> 合并署名字段 -> 返回终态载荷

use axum::{extract::State, Json};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::GenerateMusicCommand;
use crate::domain::GenerationRequest;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    // JSON null 视同缺失请求体；非 JSON 由提取器先行拒绝
    if body.is_null() {
        return Err(ApiError::BadRequest("Request body is required".to_string()));
    }

    let request: GenerationRequest = serde_json::from_value(body)
        .map_err(|_| ApiError::BadRequest("Request body must be a JSON object".to_string()))?;

    // 每个请求一个关联 ID，便于在轮询日志里追踪单次生成
    let request_id = Uuid::new_v4();
    tracing::info!(%request_id, "Generation request received");

    let result = state
        .generate_handler
        .handle(GenerateMusicCommand { request })
        .await
        .map_err(|err| {
            tracing::debug!(%request_id, "Generation request did not complete");
            ApiError::from(err)
        })?;

    tracing::info!(%request_id, "Generation request completed");

    Ok(Json(result.task))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::PollerConfig;
    use crate::infrastructure::adapters::FakeMusicClient;
    use crate::infrastructure::http::create_routes;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::json;
    use std::time::Duration;
    use tower::util::ServiceExt;

    fn test_router(engine: Arc<FakeMusicClient>) -> Router {
        let state = AppState::new(
            engine,
            PollerConfig {
                interval: Duration::from_millis(10),
                max_attempts: 3,
            },
            "Arioso Bot",
        );
        create_routes().with_state(Arc::new(state))
    }

    fn post_generate(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/generate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_generation_returns_200_with_attribution() {
        let engine = Arc::new(FakeMusicClient::new());
        engine.push_body(json!({ "ok": true, "status": "done", "audio_url": "http://a/b.mp3" }));

        let response = test_router(engine)
            .oneshot(post_generate(json!({
                "customMode": false,
                "instrumental": false,
                "prompt": "a song about rain"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["audio_url"], json!("http://a/b.mp3"));
        assert_eq!(body["creator"], json!("Arioso Bot"));
        assert!(body["completed_at"].is_string());
    }

    #[tokio::test(start_paused = true)]
    async fn test_validation_failure_returns_400_with_details() {
        let engine = Arc::new(FakeMusicClient::new());

        let response = test_router(engine)
            .oneshot(post_generate(json!({ "customMode": false, "style": "rock" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert_eq!(body["error"], json!("Validation Failed"));
        let details = body["details"].as_array().unwrap();
        assert!(details
            .iter()
            .any(|e| e.as_str().unwrap().contains("'style' should be empty")));
        assert!(details
            .iter()
            .any(|e| e.as_str().unwrap().contains("'prompt' is required")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_null_body_returns_400() {
        let engine = Arc::new(FakeMusicClient::new());

        let response = test_router(engine)
            .oneshot(post_generate(Value::Null))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert_eq!(body["message"], json!("Request body is required"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_object_body_returns_400() {
        let engine = Arc::new(FakeMusicClient::new());

        let response = test_router(engine)
            .oneshot(post_generate(json!("just a string")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_initiation_returns_502() {
        let engine = Arc::new(FakeMusicClient::new());
        engine.reject_start(json!({ "ok": false, "message": "quota exceeded" }));

        let response = test_router(engine)
            .oneshot(post_generate(json!({
                "customMode": false,
                "instrumental": false,
                "prompt": "x"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = response_json(response).await;
        assert_eq!(body["error"], json!("Failed to start generation"));
        assert_eq!(body["details"]["message"], json!("quota exceeded"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_task_returns_502_with_diagnostics() {
        let engine = Arc::new(FakeMusicClient::new());
        engine.push_body(json!({ "ok": false, "status": "failed", "message": "nope" }));

        let response = test_router(engine)
            .oneshot(post_generate(json!({
                "customMode": false,
                "instrumental": false,
                "prompt": "x"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = response_json(response).await;
        assert_eq!(body["error"], json!("Generation failed"));
        assert_eq!(body["status"], json!("failed"));
        assert_eq!(body["details"]["message"], json!("nope"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_timeout_returns_504() {
        // 空脚本：任务一直 pending，3 次尝试后超时
        let engine = Arc::new(FakeMusicClient::new());

        let response = test_router(engine.clone())
            .oneshot(post_generate(json!({
                "customMode": false,
                "instrumental": false,
                "prompt": "x"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(engine.fetch_count(), 3);
        let body = response_json(response).await;
        assert_eq!(body["error"], json!("Polling timeout"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_on_generate_is_method_not_allowed() {
        let engine = Arc::new(FakeMusicClient::new());

        let response = test_router(engine)
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/generate")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
