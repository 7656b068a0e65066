//! Arioso - 音乐生成编排服务
//!
//! 启动流程:
//! 1. 加载配置（环境变量 > 配置文件 > 默认值，凭证缺失直接启动失败）
//! 2. 初始化日志
//! 3. 构建上游客户端与应用状态
//! 4. 启动 HTTP 服务器（带优雅关闭）

use std::sync::Arc;
use std::time::Duration;

use arioso::application::PollerConfig;
use arioso::config::{load_config, print_config};
use arioso::infrastructure::adapters::{HttpMusicClient, MusicApiConfig};
use arioso::infrastructure::http::{AppState, HttpServer, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},arioso={},tower_http=debug",
        config.log.level, config.log.level
    );
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));
    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(env_filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    tracing::info!("Arioso - 音乐生成编排服务");
    print_config(&config);

    // 创建上游音乐生成服务客户端
    let engine_config = MusicApiConfig {
        base_url: config.engine.base_url.clone(),
        generate_path: config.engine.generate_path.clone(),
        api_key: config.engine.api_key.clone(),
        timeout_secs: config.engine.timeout_secs,
    };
    let engine = Arc::new(HttpMusicClient::new(engine_config)?);

    // 轮询参数
    let poller_config = PollerConfig {
        interval: Duration::from_secs(config.poller.interval_secs),
        max_attempts: config.poller.max_attempts,
    };

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(engine, poller_config, config.engine.creator_name.clone());

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
