//! Health 事件处理 - 单次调用的完整流程
//!
//! 提取字段 → 构建链接 → 格式化消息 → 选择 webhook → 投递。
//! 输入错误和配置错误向上返回（调用失败）；投递失败只记录日志。

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::config::NotifierConfig;
use crate::error::Result;
use crate::event::{extract_fields, HealthEvent};
use crate::notification::channel::{ChimeMessage, SendResult, WebhookSender};
use crate::notification::formatter::MessageFormatter;
use crate::notification::router::{route, Endpoint};
use crate::notification::webhook::ChimeWebhookClient;

/// 已准备好的通知（已格式化、已选定目标）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedNotification {
    pub endpoint: Endpoint,
    pub webhook_url: String,
    pub message: ChimeMessage,
}

/// Health 事件通知器
///
/// 配置和发送器在进程启动时创建，之后只读，可在多个调用间共享。
pub struct HealthNotifier {
    config: NotifierConfig,
    formatter: MessageFormatter,
    sender: Arc<dyn WebhookSender>,
    /// 是否为 dry-run 模式
    dry_run: bool,
}

impl HealthNotifier {
    pub fn new(config: NotifierConfig, sender: Arc<dyn WebhookSender>) -> Self {
        Self {
            config,
            formatter: MessageFormatter::new(),
            sender,
            dry_run: false,
        }
    }

    /// 使用默认的 Chime HTTP 客户端
    pub fn with_http_client(config: NotifierConfig) -> Result<Self> {
        let client = ChimeWebhookClient::new()?;
        Ok(Self::new(config, Arc::new(client)))
    }

    /// 设置 dry-run 模式
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// 替换格式化器
    pub fn with_formatter(mut self, formatter: MessageFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// 生成消息并选择目标，不发送
    pub fn prepare(&self, event: &HealthEvent) -> Result<PreparedNotification> {
        let fields = extract_fields(event)?;
        let content = self.formatter.format(&fields, &self.config)?;
        let message = ChimeMessage::new(content);

        info!(payload = %message.to_json()?, "Formatted Chime message");

        let category = event.event_type_category();
        let (endpoint, webhook_url) = route(category.as_ref(), &self.config)?;

        Ok(PreparedNotification {
            endpoint,
            webhook_url: webhook_url.to_string(),
            message,
        })
    }

    /// 处理一个事件
    pub fn handle(&self, event: &HealthEvent) -> Result<SendResult> {
        let prepared = self.prepare(event)?;

        if self.dry_run {
            eprintln!(
                "[DRY-RUN] Would send to {}: {}",
                prepared.endpoint.config_key(),
                prepared.message.to_json()?
            );
            return Ok(SendResult::Skipped("dry-run".to_string()));
        }

        let result = self.sender.send(&prepared.webhook_url, &prepared.message)?;
        if !result.is_sent() {
            warn!(
                sender = self.sender.name(),
                endpoint = prepared.endpoint.config_key(),
                "Notification not delivered"
            );
        }
        Ok(result)
    }

    /// 处理原始 JSON 事件
    pub fn handle_value(&self, event: Value) -> Result<SendResult> {
        let event = HealthEvent::from_value(event)?;
        self.handle(&event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotifierError;
    use serde_json::json;
    use std::sync::Mutex;

    /// 记录调用的 mock 发送器
    struct MockSender {
        result: SendResult,
        calls: Mutex<Vec<(String, ChimeMessage)>>,
    }

    impl MockSender {
        fn new(result: SendResult) -> Self {
            Self {
                result,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, ChimeMessage)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl WebhookSender for MockSender {
        fn name(&self) -> &str {
            "mock"
        }

        fn send(&self, url: &str, message: &ChimeMessage) -> Result<SendResult> {
            self.calls.lock().unwrap().push((url.to_string(), message.clone()));
            Ok(self.result.clone())
        }
    }

    fn config() -> NotifierConfig {
        NotifierConfig::default()
            .with_investigation_webhook("https://hooks/inv")
            .with_other_webhook("https://hooks/other")
    }

    fn event(category: &str) -> Value {
        json!({
            "account": "123456789012",
            "region": "eu-west-1",
            "resources": [],
            "detail": {
                "eventArn": "arn:1",
                "eventTypeCategory": category,
                "eventTypeCode": "AWS_RDS_MAINTENANCE_SCHEDULED",
                "service": "RDS",
                "startTime": "Mon, 01 Jan 2024 00:00:00 GMT",
                "eventDescription": [{"latestDescription": "Maintenance scheduled"}]
            }
        })
    }

    #[test]
    fn test_handle_routes_investigation() {
        let sender = Arc::new(MockSender::new(SendResult::Sent));
        let notifier = HealthNotifier::new(config(), sender.clone());

        let result = notifier.handle_value(event("investigation")).unwrap();
        assert_eq!(result, SendResult::Sent);

        let calls = sender.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "https://hooks/inv");
        assert!(calls[0].1.content.starts_with("/md\nMaintenance scheduled\n"));
        assert!(calls[0].1.content.contains("* Resources: []\n"));
        assert!(calls[0].1.content.contains("* End time: None\n"));
    }

    #[test]
    fn test_handle_routes_other() {
        let sender = Arc::new(MockSender::new(SendResult::Sent));
        let notifier = HealthNotifier::new(config(), sender.clone());

        notifier.handle_value(event("scheduledChange")).unwrap();
        assert_eq!(sender.calls()[0].0, "https://hooks/other");
    }

    #[test]
    fn test_delivery_failure_completes_normally() {
        let sender = Arc::new(MockSender::new(SendResult::Rejected {
            status: 500,
            reason: "Internal Server Error".to_string(),
        }));
        let notifier = HealthNotifier::new(config(), sender);

        let result = notifier.handle_value(event("issue")).unwrap();
        assert!(matches!(result, SendResult::Rejected { status: 500, .. }));
    }

    #[test]
    fn test_missing_description_fails_before_send() {
        let sender = Arc::new(MockSender::new(SendResult::Sent));
        let notifier = HealthNotifier::new(config(), sender.clone());

        let err = notifier
            .handle_value(json!({"detail": {"eventTypeCategory": "issue"}}))
            .unwrap_err();
        assert!(matches!(err, NotifierError::MissingField(_)));
        assert!(sender.calls().is_empty());
    }

    #[test]
    fn test_missing_webhook_fails_before_send() {
        let sender = Arc::new(MockSender::new(SendResult::Sent));
        let notifier = HealthNotifier::new(
            NotifierConfig::default().with_other_webhook("https://hooks/other"),
            sender.clone(),
        );

        let err = notifier.handle_value(event("investigation")).unwrap_err();
        assert!(matches!(err, NotifierError::MissingConfiguration(_)));
        assert!(sender.calls().is_empty());
    }

    #[test]
    fn test_absent_category_fails_before_send() {
        let sender = Arc::new(MockSender::new(SendResult::Sent));
        let notifier = HealthNotifier::new(
            NotifierConfig::default().with_other_webhook("https://hooks/other"),
            sender.clone(),
        );

        let err = notifier
            .handle_value(json!({"detail": {"eventDescription": [{"latestDescription": "d"}]}}))
            .unwrap_err();
        assert!(matches!(err, NotifierError::MissingField("detail.eventTypeCategory")));
        assert!(sender.calls().is_empty());
    }

    #[test]
    fn test_null_category_routes_to_other() {
        let sender = Arc::new(MockSender::new(SendResult::Sent));
        let notifier = HealthNotifier::new(config(), sender.clone());

        let result = notifier
            .handle_value(json!({
                "detail": {"eventTypeCategory": null, "eventDescription": [{"latestDescription": "d"}]}
            }))
            .unwrap();
        assert_eq!(result, SendResult::Sent);
        assert_eq!(sender.calls()[0].0, "https://hooks/other");
        assert!(sender.calls()[0].1.content.contains("* Event type category: None\n"));
    }

    #[test]
    fn test_bad_link_template_fails() {
        let sender = Arc::new(MockSender::new(SendResult::Sent));
        let notifier = HealthNotifier::new(
            config().with_event_url_template("https://x/{arn}"),
            sender.clone(),
        );

        let err = notifier.handle_value(event("issue")).unwrap_err();
        assert!(matches!(err, NotifierError::LinkTemplate { name: "EVENTURL", .. }));
        assert!(sender.calls().is_empty());
    }

    #[test]
    fn test_dry_run_does_not_send() {
        let sender = Arc::new(MockSender::new(SendResult::Sent));
        let notifier = HealthNotifier::new(config(), sender.clone()).with_dry_run(true);

        let result = notifier.handle_value(event("issue")).unwrap();
        assert_eq!(result, SendResult::Skipped("dry-run".to_string()));
        assert!(sender.calls().is_empty());
    }

    #[test]
    fn test_prepare() {
        let sender = Arc::new(MockSender::new(SendResult::Sent));
        let notifier = HealthNotifier::new(config().with_event_url_template("https://x/{eventArn}"), sender);

        let event = HealthEvent::from_value(event("investigation")).unwrap();
        let prepared = notifier.prepare(&event).unwrap();
        assert_eq!(prepared.endpoint, Endpoint::InvestigationEvents);
        assert_eq!(prepared.webhook_url, "https://hooks/inv");
        assert!(prepared.message.content.contains("* ARN: [arn:1](https://x/arn:1)\n"));
    }
}
