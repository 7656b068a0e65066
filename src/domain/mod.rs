//! Domain Layer - 领域层
//!
//! 包含一个限界上下文:
//! - Generation Context: 生成请求载荷与校验规则

pub mod generation;

pub use generation::{validate, GenerationRequest, ValidationReport};
