//! 消息格式化模块 - 将 Health 事件字段拼成 Chime markdown 消息
//!
//! 消息格式（首行 `/md` 让 Chime 客户端按 markdown 渲染）：
//! ```text
//! /md
//! <description>
//! * ARN: <eventArnUrl>
//! * Account: <accountUrl>
//! * Region: <region>
//! * Service: <service>
//! * Event type code: `<eventTypeCode>`
//! * Event type category: <eventTypeCategory>
//! * Start time: <startTime>
//! * End time: <endTime>
//! * Resources: <resources>
//! ```
//! 末尾固定跟一个换行和四个空格，现有消息格式就是这样，保持不变。

use serde_json::Value;

use super::link::{markdown_link, optional_url, LinkPurpose};
use crate::config::NotifierConfig;
use crate::error::Result;
use crate::event::{ExtractedFields, FieldValue};

/// markdown 指令行
pub const MARKDOWN_DIRECTIVE: &str = "/md";

/// 消息结尾
const MESSAGE_TRAILER: &str = "\n    ";

/// 消息格式化器
#[derive(Debug, Clone, Default)]
pub struct MessageFormatter {
    /// 是否转义 markdown 特殊字符（默认关闭，开启会改变消息外观）
    escape_markdown: bool,
}

impl MessageFormatter {
    /// 创建新的 MessageFormatter
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置是否转义 markdown
    pub fn with_escaping(mut self, escape_markdown: bool) -> Self {
        self.escape_markdown = escape_markdown;
        self
    }

    /// 生成完整消息
    ///
    /// 链接 URL 总是用原始字段值展开；转义只影响显示文本。
    pub fn format(&self, fields: &ExtractedFields, config: &NotifierConfig) -> Result<String> {
        let event_url = optional_url(LinkPurpose::Event, config, fields)?;
        let account_url = optional_url(LinkPurpose::Account, config, fields)?;

        let display = if self.escape_markdown {
            fields.map_values(escape_markdown_special_chars)
        } else {
            fields.clone()
        };

        let event_arn_link = markdown_link(&display.event_arn, event_url.as_deref());
        let account_link = markdown_link(&display.account, account_url.as_deref());

        Ok(format_message(&display, &event_arn_link, &account_link))
    }
}

/// 用已构建好的两个链接拼出消息
pub fn format_message(fields: &ExtractedFields, event_arn_link: &str, account_link: &str) -> String {
    format!(
        "{directive}\n\
         {description}\n\
         * ARN: {event_arn_link}\n\
         * Account: {account_link}\n\
         * Region: {region}\n\
         * Service: {service}\n\
         * Event type code: `{event_type_code}`\n\
         * Event type category: {event_type_category}\n\
         * Start time: {start_time}\n\
         * End time: {end_time}\n\
         * Resources: {resources}{trailer}",
        directive = MARKDOWN_DIRECTIVE,
        description = fields.description,
        event_arn_link = event_arn_link,
        account_link = account_link,
        region = fields.region,
        service = fields.service,
        event_type_code = fields.event_type_code,
        event_type_category = fields.event_type_category,
        start_time = fields.start_time,
        end_time = fields.end_time,
        resources = fields.resources,
        trailer = MESSAGE_TRAILER,
    )
}

/// 把包含下划线的值包进 code span
///
/// Chime Android 客户端会把下划线当成斜体标记，桌面端不会。列表逐项处理。
pub fn escape_markdown_special_chars(value: &FieldValue) -> FieldValue {
    FieldValue::new(escape_value(value.as_value()))
}

fn escape_value(value: &Value) -> Value {
    match value {
        Value::String(s) if s.contains('_') => Value::String(format!("`{}`", s)),
        Value::Array(items) => Value::Array(items.iter().map(escape_value).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields() -> ExtractedFields {
        ExtractedFields {
            account: "123456789012".into(),
            description: "Elevated API error rates".into(),
            end_time: FieldValue::null(),
            event_arn: "arn:aws:health:us-east-1::event/EC2/AWS_EC2_OPERATIONAL_ISSUE/abc".into(),
            event_type_category: "issue".into(),
            event_type_code: "AWS_EC2_OPERATIONAL_ISSUE".into(),
            resources: FieldValue::new(json!(["i-1", "i-2"])),
            region: "us-east-1".into(),
            service: "EC2".into(),
            start_time: "Sat, 04 Jun 2016 05:01:10 GMT".into(),
        }
    }

    #[test]
    fn test_format_exact_layout() {
        let message = MessageFormatter::new()
            .format(&fields(), &NotifierConfig::default())
            .unwrap();

        let expected = "/md\n\
            Elevated API error rates\n\
            * ARN: arn:aws:health:us-east-1::event/EC2/AWS_EC2_OPERATIONAL_ISSUE/abc\n\
            * Account: 123456789012\n\
            * Region: us-east-1\n\
            * Service: EC2\n\
            * Event type code: `AWS_EC2_OPERATIONAL_ISSUE`\n\
            * Event type category: issue\n\
            * Start time: Sat, 04 Jun 2016 05:01:10 GMT\n\
            * End time: None\n\
            * Resources: ['i-1', 'i-2']\n    ";
        assert_eq!(message, expected);
    }

    #[test]
    fn test_description_is_first_body_line() {
        let message = MessageFormatter::new()
            .format(&fields(), &NotifierConfig::default())
            .unwrap();
        let mut lines = message.lines();
        assert_eq!(lines.next(), Some("/md"));
        assert_eq!(lines.next(), Some("Elevated API error rates"));
    }

    #[test]
    fn test_all_absent_fields_render_none() {
        let fields = ExtractedFields {
            description: "d".into(),
            ..Default::default()
        };
        let message = MessageFormatter::new()
            .format(&fields, &NotifierConfig::default())
            .unwrap();

        assert!(message.contains("* ARN: None\n"));
        assert!(message.contains("* Account: None\n"));
        assert!(message.contains("* Event type code: `None`\n"));
        assert!(message.contains("* Resources: None\n"));
    }

    #[test]
    fn test_links_in_message() {
        let config = NotifierConfig::default()
            .with_event_url_template("https://phd.aws.amazon.com/phd/home#/event-log?eventID={eventArn}")
            .with_account_url_template("https://accounts/{account}");
        let message = MessageFormatter::new().format(&fields(), &config).unwrap();

        assert!(message.contains(
            "* ARN: [arn:aws:health:us-east-1::event/EC2/AWS_EC2_OPERATIONAL_ISSUE/abc](https://phd.aws.amazon.com/phd/home#/event-log?eventID=arn:aws:health:us-east-1::event/EC2/AWS_EC2_OPERATIONAL_ISSUE/abc)\n"
        ));
        assert!(message.contains("* Account: [123456789012](https://accounts/123456789012)\n"));
    }

    #[test]
    fn test_template_error_propagates() {
        let config = NotifierConfig::default().with_account_url_template("https://accounts/{acct}");
        assert!(MessageFormatter::new().format(&fields(), &config).is_err());
    }

    #[test]
    fn test_no_escaping_by_default() {
        let message = MessageFormatter::new()
            .format(&fields(), &NotifierConfig::default())
            .unwrap();
        assert!(message.contains("/AWS_EC2_OPERATIONAL_ISSUE/abc\n"));
        assert!(!message.contains("`arn:"));
    }

    #[test]
    fn test_escaping_when_enabled() {
        let config = NotifierConfig::default().with_event_url_template("https://x/{eventArn}");
        let mut fields = fields();
        fields.resources = FieldValue::new(json!(["vol_1", "i-2"]));

        let message = MessageFormatter::new()
            .with_escaping(true)
            .format(&fields, &config)
            .unwrap();

        // URL 用原始值，显示文本被转义
        assert!(message.contains(
            "* ARN: [`arn:aws:health:us-east-1::event/EC2/AWS_EC2_OPERATIONAL_ISSUE/abc`](https://x/arn:aws:health:us-east-1::event/EC2/AWS_EC2_OPERATIONAL_ISSUE/abc)\n"
        ));
        assert!(message.contains("* Resources: ['`vol_1`', 'i-2']\n"));
        assert!(message.contains("* Region: us-east-1\n"));
    }

    #[test]
    fn test_escape_helper() {
        assert_eq!(escape_markdown_special_chars(&"a_b".into()), FieldValue::from("`a_b`"));
        assert_eq!(escape_markdown_special_chars(&"ab".into()), FieldValue::from("ab"));
        assert!(escape_markdown_special_chars(&FieldValue::null()).is_null());
    }
}
