//! 通知层 - 链接构建、消息格式化、路由和 webhook 投递
//!
//! # 使用示例
//! ```ignore
//! use chime_notifier::notification::{MessageFormatter, route};
//!
//! let content = MessageFormatter::new().format(&fields, &config)?;
//! let (endpoint, url) = route(event.event_type_category().as_ref(), &config)?;
//! ```

pub mod channel;
pub mod formatter;
pub mod link;
pub mod router;
pub mod webhook;

pub use channel::{ChimeMessage, SendResult, WebhookSender};
pub use formatter::{escape_markdown_special_chars, format_message, MessageFormatter};
pub use link::{build_link, LinkPurpose};
pub use router::{route, select_endpoint, Endpoint};
pub use webhook::ChimeWebhookClient;
