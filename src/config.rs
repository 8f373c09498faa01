//! 配置 - 进程启动时从环境变量读取一次，之后只读
//!
//! | 环境变量 | 必需 | 作用 |
//! |---|---|---|
//! | `CHIMEWEBHOOKINVESTIGATIONEVENTS` | 是 | `investigation` 类事件的 webhook |
//! | `CHIMEWEBHOOKOTHEREVENTS` | 是 | 其他事件的 webhook |
//! | `EVENTURL` | 否 | 事件 ARN 链接模板 |
//! | `ACCOUNTURL` | 否 | 账号链接模板 |
//!
//! webhook 在被选中时才校验是否存在，所以只配置了一个 webhook 的部署
//! 仍可以处理路由到该 webhook 的事件。

use std::env;

pub const INVESTIGATION_WEBHOOK_VAR: &str = "CHIMEWEBHOOKINVESTIGATIONEVENTS";
pub const OTHER_WEBHOOK_VAR: &str = "CHIMEWEBHOOKOTHEREVENTS";
pub const EVENT_URL_VAR: &str = "EVENTURL";
pub const ACCOUNT_URL_VAR: &str = "ACCOUNTURL";

/// 通知配置
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifierConfig {
    /// investigation 事件的 webhook URL
    pub investigation_webhook: Option<String>,
    /// 其他事件的 webhook URL
    pub other_webhook: Option<String>,
    /// 事件 ARN 链接模板（`EVENTURL`）
    pub event_url_template: Option<String>,
    /// 账号链接模板（`ACCOUNTURL`）
    pub account_url_template: Option<String>,
}

impl NotifierConfig {
    /// 从进程环境变量加载
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意 key -> value 查找函数加载，空字符串视为未设置
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            investigation_webhook: read(INVESTIGATION_WEBHOOK_VAR),
            other_webhook: read(OTHER_WEBHOOK_VAR),
            event_url_template: read(EVENT_URL_VAR),
            account_url_template: read(ACCOUNT_URL_VAR),
        }
    }

    /// 设置 investigation webhook
    pub fn with_investigation_webhook(mut self, url: impl Into<String>) -> Self {
        self.investigation_webhook = Some(url.into());
        self
    }

    /// 设置其他事件 webhook
    pub fn with_other_webhook(mut self, url: impl Into<String>) -> Self {
        self.other_webhook = Some(url.into());
        self
    }

    /// 设置事件链接模板
    pub fn with_event_url_template(mut self, template: impl Into<String>) -> Self {
        self.event_url_template = Some(template.into());
        self
    }

    /// 设置账号链接模板
    pub fn with_account_url_template(mut self, template: impl Into<String>) -> Self {
        self.account_url_template = Some(template.into());
        self
    }
}
