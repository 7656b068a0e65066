//! Application State

use std::sync::Arc;

use crate::application::{GenerateMusicHandler, MusicEnginePort, PollerConfig};

/// 应用状态
///
/// 每个请求独立执行，状态里只有无共享可变数据的 handler
pub struct AppState {
    pub generate_handler: GenerateMusicHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        engine: Arc<dyn MusicEnginePort>,
        poller_config: PollerConfig,
        creator_name: impl Into<String>,
    ) -> Self {
        Self {
            generate_handler: GenerateMusicHandler::new(engine, poller_config, creator_name),
        }
    }
}
