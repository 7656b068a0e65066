//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping      GET   健康检查
//! - /api/generate  POST  发起音乐生成并等待终态（同步返回最终结果）

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/generate", post(handlers::generate))
}
