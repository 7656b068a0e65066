//! Generation Context - 音乐生成限界上下文
//!
//! 职责:
//! - 生成请求载荷（宽松类型，运行时检查）
//! - 双模式校验规则（custom / non-custom × instrumental / vocal）

mod payload;
mod validator;

pub use payload::GenerationRequest;
pub use validator::{validate, ValidationReport};
