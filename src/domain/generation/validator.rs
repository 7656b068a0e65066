//! 生成请求校验
//!
//! 纯函数：不做 I/O，错误全部累积后一次返回。
//! 唯一的副作用是 custom+instrumental 模式下清空已提供的 prompt。

use serde_json::Value;

use super::payload::{is_truthy, GenerationRequest};

/// non-custom 模式 prompt 上限（字符数）
const PROMPT_MAX_CHARS: usize = 400;
/// custom 模式 prompt 上限（字符数）
const CUSTOM_PROMPT_MAX_CHARS: usize = 5000;
/// style 上限（字符数）
const STYLE_MAX_CHARS: usize = 1000;
/// title 上限（字符数）
const TITLE_MAX_CHARS: usize = 80;

/// 校验结果
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub valid: bool,
    /// 按检查顺序排列的全部违反项
    pub errors: Vec<String>,
}

/// 校验生成请求
///
/// 按 customMode 分支校验；长度以字符计，不以字节计。
/// custom+instrumental 模式下把已提供的 prompt 清成空串（不计为错误）。
/// 已合法的输入重复校验结果不变（清空操作幂等）。
pub fn validate(request: &mut GenerationRequest) -> ValidationReport {
    let mut errors = Vec::new();

    if request.is_custom() {
        // Custom 模式
        match &request.style {
            Some(style) if is_truthy(style) => {
                if !is_string_within(style, STYLE_MAX_CHARS) {
                    errors.push("'style' must be a string with max 1000 characters".to_string());
                }
            }
            _ => errors.push("In customMode, 'style' is required".to_string()),
        }

        match &request.title {
            Some(title) if is_truthy(title) => {
                if !is_string_within(title, TITLE_MAX_CHARS) {
                    errors.push("'title' must be a string with max 80 characters".to_string());
                }
            }
            _ => errors.push("In customMode, 'title' is required".to_string()),
        }

        if request.wants_instrumental() {
            // 纯音乐：prompt 被忽略，提供了就清空
            if request.prompt.as_ref().is_some_and(is_truthy) {
                request.prompt = Some(Value::String(String::new()));
            }
        } else {
            match &request.prompt {
                Some(prompt) if is_truthy(prompt) => {
                    if !is_string_within(prompt, CUSTOM_PROMPT_MAX_CHARS) {
                        errors
                            .push("'prompt' must be a string with max 5000 characters".to_string());
                    }
                }
                _ => errors.push(
                    "In customMode with instrumental=false, 'prompt' is required".to_string(),
                ),
            }
        }
    } else {
        // Non-custom 模式
        match &request.prompt {
            Some(prompt) if is_truthy(prompt) => {
                if !is_string_within(prompt, PROMPT_MAX_CHARS) {
                    errors.push(
                        "'prompt' must be a string with max 400 characters in non-customMode"
                            .to_string(),
                    );
                }
            }
            _ => errors.push("In non-customMode, 'prompt' is required".to_string()),
        }

        if let Some(title) = &request.title {
            if is_truthy(title) && !is_string_within(title, TITLE_MAX_CHARS) {
                errors.push("'title' must be a string with max 80 characters".to_string());
            }
        }

        // non-custom 模式下 style 必须为空
        if let Some(style) = &request.style {
            if is_truthy(style) {
                errors.push("In non-customMode, 'style' should be empty".to_string());
            }
        }
    }

    // 模式无关检查
    if !request.instrumental.is_boolean() {
        errors.push("'instrumental' must be a boolean".to_string());
    }

    if let Some(model) = &request.model {
        if is_truthy(model) && !model.is_string() {
            errors.push("'model' must be a string".to_string());
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

/// 是字符串且长度（字符数）不超过上限
///
/// 值不是字符串时长度无从谈起，与超长合并为同一条错误
fn is_string_within(value: &Value, max_chars: usize) -> bool {
    value
        .as_str()
        .map(|s| s.chars().count() <= max_chars)
        .unwrap_or(false)
}
