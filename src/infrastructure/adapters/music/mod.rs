//! Music Adapter - 上游音乐生成服务客户端实现

mod fake_music_client;
mod http_music_client;

pub use fake_music_client::FakeMusicClient;
pub use http_music_client::{HttpMusicClient, MusicApiConfig};
