//! 路由 - 根据事件类别选择 webhook

use tracing::debug;

use crate::config::{NotifierConfig, INVESTIGATION_WEBHOOK_VAR, OTHER_WEBHOOK_VAR};
use crate::error::{NotifierError, Result};
use crate::event::FieldValue;

/// investigation 类别标签
pub const INVESTIGATION_CATEGORY: &str = "investigation";

/// 目标 webhook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// investigation 事件
    InvestigationEvents,
    /// 其他所有事件
    OtherEvents,
}

impl Endpoint {
    /// 对应的配置项名
    pub fn config_key(&self) -> &'static str {
        match self {
            Endpoint::InvestigationEvents => INVESTIGATION_WEBHOOK_VAR,
            Endpoint::OtherEvents => OTHER_WEBHOOK_VAR,
        }
    }

    /// 从配置中取 URL，未设置时返回 `MissingConfiguration`
    pub fn resolve<'a>(&self, config: &'a NotifierConfig) -> Result<&'a str> {
        let url = match self {
            Endpoint::InvestigationEvents => config.investigation_webhook.as_deref(),
            Endpoint::OtherEvents => config.other_webhook.as_deref(),
        };
        url.filter(|u| !u.is_empty())
            .ok_or(NotifierError::MissingConfiguration(self.config_key()))
    }
}

/// 按类别选择 endpoint；null 或其他值一律归入 `OtherEvents`
pub fn select_endpoint(category: &FieldValue) -> Endpoint {
    if category.as_str() == Some(INVESTIGATION_CATEGORY) {
        Endpoint::InvestigationEvents
    } else {
        Endpoint::OtherEvents
    }
}

/// 选择 endpoint 并解析出 webhook URL
///
/// `category` 为 `None` 表示事件里没有 `detail.eventTypeCategory` 键，视为输入格式错误。
pub fn route<'a>(
    category: Option<&FieldValue>,
    config: &'a NotifierConfig,
) -> Result<(Endpoint, &'a str)> {
    let category = category.ok_or(NotifierError::MissingField("detail.eventTypeCategory"))?;
    let endpoint = select_endpoint(category);
    let url = endpoint.resolve(config)?;
    debug!(category = %category, endpoint = endpoint.config_key(), "Selected webhook endpoint");
    Ok((endpoint, url))
}
