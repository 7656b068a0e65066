//! Application Commands - 命令及处理器

pub mod handlers;

mod generate_commands;

pub use generate_commands::{GenerateMusicCommand, GenerateMusicResponse};
