//! 错误类型定义
//!
//! 输入格式错误和配置错误会直接失败本次调用；
//! 投递阶段的 HTTP / 网络错误不在这里，它们只记录日志（见 `notification::webhook`）。

use thiserror::Error;

/// chime-notifier 错误
#[derive(Debug, Error)]
pub enum NotifierError {
    /// 事件 JSON 无法解析为 Health 事件结构
    #[error("malformed health event: {0}")]
    MalformedInput(#[from] serde_json::Error),

    /// 必需字段缺失（例如 `detail.eventDescription[0].latestDescription`）
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// 必需的环境变量未设置
    #[error("missing configuration: {0} is not set")]
    MissingConfiguration(&'static str),

    /// 链接模板无法展开
    #[error("invalid link template {name}: {reason}")]
    LinkTemplate { name: &'static str, reason: String },

    /// Webhook URL 无法构造成请求
    #[error("invalid webhook url: {0}")]
    InvalidWebhookUrl(String),

    /// 投递阶段的其他意外错误（不属于 HTTP 状态或连接失败）
    #[error("unexpected delivery failure: {0}")]
    Delivery(String),
}

pub type Result<T> = std::result::Result<T, NotifierError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = NotifierError::MissingConfiguration("CHIMEWEBHOOKOTHEREVENTS");
        assert_eq!(
            err.to_string(),
            "missing configuration: CHIMEWEBHOOKOTHEREVENTS is not set"
        );

        let err = NotifierError::LinkTemplate {
            name: "EVENTURL",
            reason: "unknown placeholder 'foo'".to_string(),
        };
        assert!(err.to_string().contains("EVENTURL"));
        assert!(err.to_string().contains("foo"));
    }

    #[test]
    fn test_from_serde_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: NotifierError = parse_err.into();
        assert!(matches!(err, NotifierError::MalformedInput(_)));
    }
}
