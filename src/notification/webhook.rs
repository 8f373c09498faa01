//! Chime Webhook 客户端模块
//!
//! 单次阻塞 POST，不重试。HTTP 错误状态和连接失败只记录日志，不向上抛出。

use std::error::Error as StdError;

use reqwest::blocking::Client;
use tracing::{error, info};

use super::channel::{ChimeMessage, SendResult, WebhookSender};
use crate::error::{NotifierError, Result};

/// Chime Webhook 客户端
///
/// 不设置显式超时，使用 HTTP 客户端默认值。
#[derive(Debug, Clone)]
pub struct ChimeWebhookClient {
    client: Client,
}

impl ChimeWebhookClient {
    /// 创建新的 Webhook 客户端
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| NotifierError::Delivery(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl WebhookSender for ChimeWebhookClient {
    fn name(&self) -> &str {
        "chime"
    }

    fn send(&self, url: &str, message: &ChimeMessage) -> Result<SendResult> {
        let response = match self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(message)
            .send()
        {
            Ok(response) => response,
            Err(e) if e.is_builder() => {
                return Err(NotifierError::InvalidWebhookUrl(format!("{}: {}", url, e)));
            }
            Err(e) => {
                let reason = error_reason(&e);
                error!(reason = %reason, "Server connection failed");
                return Ok(SendResult::Unreachable(reason));
            }
        };

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let reason = status.canonical_reason().unwrap_or_default().to_string();
            error!(status = status.as_u16(), reason = %reason, "Request failed");
            return Ok(SendResult::Rejected {
                status: status.as_u16(),
                reason,
            });
        }

        response
            .bytes()
            .map_err(|e| NotifierError::Delivery(format!("Failed to read response: {}", e)))?;

        info!(status = status.as_u16(), "Notification delivered");
        Ok(SendResult::Sent)
    }
}

/// 取错误链最底层的原因（例如 "Connection refused"）
fn error_reason(err: &reqwest::Error) -> String {
    let mut reason = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        reason = cause.to_string();
        source = cause.source();
    }
    reason
}
