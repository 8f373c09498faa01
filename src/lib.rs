//! Chime Notifier - 把 AWS Health 事件转发到 Amazon Chime 聊天室

pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod notification;

pub use config::NotifierConfig;
pub use error::{NotifierError, Result};
pub use event::{extract_fields, ExtractedFields, FieldValue, HealthEvent};
pub use handler::{HealthNotifier, PreparedNotification};
pub use notification::{ChimeMessage, ChimeWebhookClient, Endpoint, MessageFormatter, SendResult, WebhookSender};
