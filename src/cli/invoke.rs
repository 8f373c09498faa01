//! Invoke 命令 - 在本地对单个事件执行一次完整流程
//!
//! 事件从文件读取，`-` 表示从 stdin 读取。

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::config::NotifierConfig;
use crate::event::HealthEvent;
use crate::handler::HealthNotifier;
use crate::notification::channel::SendResult;

/// Invoke 命令参数
#[derive(Args, Debug)]
pub struct InvokeArgs {
    /// 事件 JSON 文件路径（`-` 表示 stdin）
    #[arg(long, short)]
    pub event: PathBuf,

    /// Dry-run 模式（只打印不发送）
    #[arg(long)]
    pub dry_run: bool,

    /// 输出 JSON 格式
    #[arg(long)]
    pub json: bool,
}

/// Invoke 命令输出
#[derive(Debug, Serialize)]
pub struct InvokeOutput {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<&SendResult> for InvokeOutput {
    fn from(result: &SendResult) -> Self {
        let (status, detail) = match result {
            SendResult::Sent => ("sent", None),
            SendResult::Skipped(reason) => ("skipped", Some(reason.clone())),
            SendResult::Rejected { status, reason } => ("rejected", Some(format!("{} {}", status, reason))),
            SendResult::Unreachable(reason) => ("unreachable", Some(reason.clone())),
        };
        Self {
            status: status.to_string(),
            detail,
        }
    }
}

/// 读取事件 JSON
pub fn read_event(path: &Path) -> Result<HealthEvent> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read event from stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read event file {}", path.display()))?
    };

    Ok(HealthEvent::from_json(&raw)?)
}

/// 处理 invoke 命令
pub fn handle_invoke(args: InvokeArgs) -> Result<()> {
    let event = read_event(&args.event)?;
    let notifier = HealthNotifier::with_http_client(NotifierConfig::from_env())?.with_dry_run(args.dry_run);

    let result = notifier.handle(&event)?;
    let output = InvokeOutput::from(&result);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        match output.detail {
            Some(detail) => println!("{}: {}", output.status, detail),
            None => println!("{}", output.status),
        }
    }

    Ok(())
}
