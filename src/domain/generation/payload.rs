//! 生成请求载荷
//!
//! 入站 JSON 是鸭子类型的：字段可能缺失、可能类型错误。
//! 这里只建模形状，类型检查统一在 validator 中进行；
//! 未识别的字段原样透传给上游服务。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 音乐生成请求
///
/// 所有字段都以 `serde_json::Value` 保存，任何 JSON 对象都能反序列化成功。
/// 形状问题由 `validate` 累积报告，而不是在反序列化时拒绝，
/// 这样调用方一次就能看到全部违反项。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// 校验分支选择：严格等于 true 时走 custom 模式
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub custom_mode: Value,

    /// 是否纯音乐（无人声）；必须为布尔值，同时以"非 true 即 false"参与分支选择
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub instrumental: Value,

    /// 描述文本；长度上限随模式变化（400 / 5000 字符）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<Value>,

    /// 风格；custom 模式必填（≤1000 字符），non-custom 模式必须为空
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,

    /// 标题；custom 模式必填，两种模式都限制 80 字符
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,

    /// 模型标识，仅做类型检查后透传
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<Value>,

    /// 负面标签，不校验，原样透传
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_tags: Option<Value>,

    /// 未识别字段，原样透传给上游
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GenerationRequest {
    /// custom 模式判定：严格等于布尔 true，任何其他值都落入 non-custom 分支
    pub fn is_custom(&self) -> bool {
        self.custom_mode == Value::Bool(true)
    }

    /// instrumental 分支判定：同样严格等于布尔 true
    ///
    /// `instrumental` 类型错误时 validator 会记录错误，
    /// 但分支选择仍按"非 true 即 false"执行，两种效果同时发生
    pub fn wants_instrumental(&self) -> bool {
        self.instrumental == Value::Bool(true)
    }
}

/// JS 真值语义：null / false / 0 / "" 为假，其余为真
///
/// 校验规则里的"存在"指字段为真值，空字符串与 0 视同缺失
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
