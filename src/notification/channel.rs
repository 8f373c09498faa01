//! Chime 消息与投递 trait 定义

use serde::{Deserialize, Serialize};

use crate::error::{NotifierError, Result};

/// Chime webhook 请求体：`{"Content": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChimeMessage {
    #[serde(rename = "Content")]
    pub content: String,
}

impl ChimeMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// 序列化为 JSON 请求体
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| NotifierError::Delivery(e.to_string()))
    }
}

/// 投递结果
///
/// `Rejected` 和 `Unreachable` 已经记录过日志，调用方按成功处理即可。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendResult {
    /// 投递成功
    Sent,
    /// 跳过（dry-run）
    Skipped(String),
    /// 服务端返回 4xx/5xx
    Rejected { status: u16, reason: String },
    /// 连接失败（DNS、拒绝连接、超时等）
    Unreachable(String),
}

impl SendResult {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendResult::Sent)
    }
}

/// Webhook 投递 trait
pub trait WebhookSender: Send + Sync {
    /// 名称（用于日志）
    fn name(&self) -> &str;

    /// 同步 POST 消息到 webhook
    ///
    /// HTTP 错误状态和连接失败以 `Ok(SendResult::..)` 返回；
    /// 只有无法归类的错误才返回 `Err`。
    fn send(&self, url: &str, message: &ChimeMessage) -> Result<SendResult>;
}
