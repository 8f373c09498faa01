//! 链接构建 - 用 `EVENTURL` / `ACCOUNTURL` 模板生成 markdown 链接
//!
//! 模板语法：`{字段名}` 替换为提取字段的值，`{{` / `}}` 输出字面量花括号。
//! 未知字段名、位置参数 `{}`、格式说明符、不成对的花括号都视为部署配置错误。

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::config::{NotifierConfig, ACCOUNT_URL_VAR, EVENT_URL_VAR};
use crate::error::{NotifierError, Result};
use crate::event::{ExtractedFields, FieldValue};

/// 链接用途
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPurpose {
    /// 事件 ARN 链接
    Event,
    /// 账号链接
    Account,
}

impl LinkPurpose {
    /// 对应的配置项名
    pub fn config_key(&self) -> &'static str {
        match self {
            LinkPurpose::Event => EVENT_URL_VAR,
            LinkPurpose::Account => ACCOUNT_URL_VAR,
        }
    }

    /// 链接文字使用的字段
    pub fn identifier<'a>(&self, fields: &'a ExtractedFields) -> &'a FieldValue {
        match self {
            LinkPurpose::Event => &fields.event_arn,
            LinkPurpose::Account => &fields.account,
        }
    }

    fn template<'a>(&self, config: &'a NotifierConfig) -> Option<&'a str> {
        let template = match self {
            LinkPurpose::Event => config.event_url_template.as_deref(),
            LinkPurpose::Account => config.account_url_template.as_deref(),
        };
        template.filter(|t| !t.is_empty())
    }
}

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\{\{|\}\}|\{([^{}]*)\}|[{}]").expect("valid token regex"))
}

/// 展开模板
///
/// `name` 只用于错误信息（配置项名）。
pub fn expand_template(name: &'static str, template: &str, fields: &ExtractedFields) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in token_regex().captures_iter(template) {
        let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
        out.push_str(&template[last..whole.start]);
        last = whole.end;
        out.push_str(&expand_token(name, &caps, fields)?);
    }
    out.push_str(&template[last..]);

    Ok(out)
}

fn expand_token(name: &'static str, caps: &Captures<'_>, fields: &ExtractedFields) -> Result<String> {
    let token = &caps[0];
    let template_err = |reason: String| NotifierError::LinkTemplate { name, reason };

    match token {
        "{{" => return Ok("{".to_string()),
        "}}" => return Ok("}".to_string()),
        "{" => return Err(template_err("single '{' encountered in template".to_string())),
        "}" => return Err(template_err("single '}' encountered in template".to_string())),
        _ => {}
    }

    let key = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    if key.is_empty() {
        return Err(template_err("positional placeholder '{}' is not supported".to_string()));
    }

    fields
        .get(key)
        .map(|value| value.to_string())
        .ok_or_else(|| template_err(format!("unknown placeholder '{{{}}}'", key)))
}

/// 按配置生成 URL；模板未设置、为空或展开结果为空时返回 `None`
pub fn optional_url(
    purpose: LinkPurpose,
    config: &NotifierConfig,
    fields: &ExtractedFields,
) -> Result<Option<String>> {
    match purpose.template(config) {
        Some(template) => {
            let url = expand_template(purpose.config_key(), template, fields)?;
            Ok(Some(url).filter(|u| !u.is_empty()))
        }
        None => Ok(None),
    }
}

/// 有 URL 时输出 `[identifier](url)`，否则输出 identifier 本身
pub fn markdown_link(identifier: &FieldValue, url: Option<&str>) -> String {
    match url {
        Some(url) => format!("[{}]({})", identifier, url),
        None => identifier.to_string(),
    }
}

/// 构建链接文本
pub fn build_link(purpose: LinkPurpose, config: &NotifierConfig, fields: &ExtractedFields) -> Result<String> {
    let url = optional_url(purpose, config, fields)?;
    Ok(markdown_link(purpose.identifier(fields), url.as_deref()))
}
