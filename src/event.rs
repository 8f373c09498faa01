//! AWS Health 事件模型与字段提取
//!
//! 事件来自 EventBridge，格式固定：
//! ```json
//! {
//!   "account": "123456789012",
//!   "region": "us-east-1",
//!   "resources": ["i-abc"],
//!   "detail": {
//!     "eventArn": "arn:aws:health:...",
//!     "service": "EC2",
//!     "eventTypeCode": "AWS_EC2_OPERATIONAL_ISSUE",
//!     "eventTypeCategory": "issue",
//!     "startTime": "...",
//!     "endTime": "...",
//!     "eventDescription": [{"language": "en_US", "latestDescription": "..."}]
//!   }
//! }
//! ```
//!
//! 除 `description` 外所有字段缺失时都取 null，不报错。

use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{NotifierError, Result};

/// Health 事件（只读输入）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthEvent {
    #[serde(default)]
    pub account: Value,
    #[serde(default)]
    pub region: Value,
    #[serde(default)]
    pub resources: Value,
    #[serde(default)]
    pub detail: Option<EventDetail>,
}

/// 事件 detail 部分
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    #[serde(default)]
    pub event_description: Option<Vec<EventDescription>>,
    #[serde(default)]
    pub event_arn: Value,
    /// 键不存在时为 `None`；路由需要区分缺失和显式 null
    #[serde(default, deserialize_with = "present")]
    pub event_type_category: Option<Value>,
    #[serde(default)]
    pub event_type_code: Value,
    #[serde(default)]
    pub service: Value,
    #[serde(default)]
    pub start_time: Value,
    #[serde(default)]
    pub end_time: Value,
}

/// 事件描述（只使用第一条的 latestDescription）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDescription {
    /// 键不存在时为 `None`；显式 null 为 `Some(Value::Null)`
    #[serde(default, deserialize_with = "present")]
    pub latest_description: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl HealthEvent {
    /// 从 JSON 值解析
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// 路由用的事件类别；`detail.eventTypeCategory` 键不存在时为 `None`
    pub fn event_type_category(&self) -> Option<FieldValue> {
        self.detail
            .as_ref()?
            .event_type_category
            .clone()
            .map(FieldValue::from)
    }
}

/// 提取后的字段值
///
/// `Display` 沿用现有 Chime 消息格式的字符串化规则，
/// 已有的消息消费方依赖这个格式，不要改成更"干净"的写法：
/// - null / 缺失 → `None`
/// - 字符串原样输出
/// - 布尔值 → `True` / `False`
/// - 列表 → `['a', 'b']`
/// - 对象 → `{'k': 'v'}`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldValue(Value);

impl FieldValue {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn null() -> Self {
        Self(Value::Null)
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self(Value::String(s.to_string()))
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write_repr(f, other),
        }
    }
}

/// 以 repr 形式输出（容器内元素的格式）
fn write_repr(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => f.write_str("None"),
        Value::Bool(true) => f.write_str("True"),
        Value::Bool(false) => f.write_str("False"),
        Value::Number(n) => write!(f, "{}", n),
        Value::String(s) => f.write_str(&quote(s)),
        Value::Array(items) => {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_repr(f, item)?;
            }
            f.write_str("]")
        }
        Value::Object(map) => {
            f.write_str("{")?;
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                f.write_str(&quote(key))?;
                f.write_str(": ")?;
                write_repr(f, item)?;
            }
            f.write_str("}")
        }
    }
}

/// 字符串 repr：默认单引号；包含 `'` 且不含 `"` 时用双引号
fn quote(s: &str) -> String {
    let delim = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(delim);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c if !is_printable(c) => out.push_str(&escape_code_point(c)),
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}

/// 不可打印字符的转义：`\xNN` / `\uNNNN` / `\UNNNNNNNN`
fn escape_code_point(c: char) -> String {
    let cp = c as u32;
    if cp < 0x100 {
        format!("\\x{:02x}", cp)
    } else if cp < 0x10000 {
        format!("\\u{:04x}", cp)
    } else {
        format!("\\U{:08x}", cp)
    }
}

/// 是否可打印
///
/// 覆盖控制字符、非 ASCII 空白、行/段分隔符、常见格式字符、私用区和非字符。
/// 未分配码位需要完整的 Unicode 类别表，这里按可打印处理。
fn is_printable(c: char) -> bool {
    !matches!(
        c as u32,
        0x00..=0x1f
            | 0x7f..=0xa0
            | 0xad
            | 0x0600..=0x0605
            | 0x061c
            | 0x06dd
            | 0x070f
            | 0x1680
            | 0x180e
            | 0x2000..=0x200f
            | 0x2028..=0x202f
            | 0x205f..=0x2064
            | 0x2066..=0x206f
            | 0x3000
            | 0xe000..=0xf8ff
            | 0xfdd0..=0xfdef
            | 0xfeff
            | 0xfff9..=0xfffb
            | 0xfffe..=0xffff
            | 0xf0000..=0x10ffff
    )
}

/// 模板中可用的字段名（顺序即提取顺序）
pub const FIELD_NAMES: [&str; 10] = [
    "account",
    "description",
    "endTime",
    "eventArn",
    "eventTypeCategory",
    "eventTypeCode",
    "resources",
    "region",
    "service",
    "startTime",
];

/// 从事件中提取的字段（每次调用新建）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    pub account: FieldValue,
    pub description: FieldValue,
    pub end_time: FieldValue,
    pub event_arn: FieldValue,
    pub event_type_category: FieldValue,
    pub event_type_code: FieldValue,
    pub resources: FieldValue,
    pub region: FieldValue,
    pub service: FieldValue,
    pub start_time: FieldValue,
}

impl ExtractedFields {
    /// 按模板字段名查找
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        let value = match name {
            "account" => &self.account,
            "description" => &self.description,
            "endTime" => &self.end_time,
            "eventArn" => &self.event_arn,
            "eventTypeCategory" => &self.event_type_category,
            "eventTypeCode" => &self.event_type_code,
            "resources" => &self.resources,
            "region" => &self.region,
            "service" => &self.service,
            "startTime" => &self.start_time,
            _ => return None,
        };
        Some(value)
    }

    /// 对每个字段应用变换
    pub fn map_values<F>(&self, f: F) -> Self
    where
        F: Fn(&FieldValue) -> FieldValue,
    {
        Self {
            account: f(&self.account),
            description: f(&self.description),
            end_time: f(&self.end_time),
            event_arn: f(&self.event_arn),
            event_type_category: f(&self.event_type_category),
            event_type_code: f(&self.event_type_code),
            resources: f(&self.resources),
            region: f(&self.region),
            service: f(&self.service),
            start_time: f(&self.start_time),
        }
    }
}

/// 提取字段
///
/// `description` 取自 `detail.eventDescription[0].latestDescription`，路径不存在
/// 时返回 `MissingField`。其余字段缺失时为 null。
pub fn extract_fields(event: &HealthEvent) -> Result<ExtractedFields> {
    let detail = event
        .detail
        .as_ref()
        .ok_or(NotifierError::MissingField("detail"))?;

    let description = detail
        .event_description
        .as_ref()
        .and_then(|descriptions| descriptions.first())
        .and_then(|first| first.latest_description.clone())
        .ok_or(NotifierError::MissingField(
            "detail.eventDescription[0].latestDescription",
        ))?;

    Ok(ExtractedFields {
        account: event.account.clone().into(),
        description: description.into(),
        end_time: detail.end_time.clone().into(),
        event_arn: detail.event_arn.clone().into(),
        event_type_category: detail.event_type_category.clone().unwrap_or_default().into(),
        event_type_code: detail.event_type_code.clone().into(),
        resources: event.resources.clone().into(),
        region: event.region.clone().into(),
        service: detail.service.clone().into(),
        start_time: detail.start_time.clone().into(),
    })
}
