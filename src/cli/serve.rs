//! Serve 命令 - 作为 Lambda 函数运行
//!
//! 每个事件交给阻塞线程执行完整流程；流程返回错误时本次调用失败。

use std::sync::Arc;

use anyhow::{anyhow, Result};
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use tracing::info;

use crate::config::NotifierConfig;
use crate::handler::HealthNotifier;

/// 处理 serve 命令
pub fn handle_serve() -> Result<()> {
    let notifier = Arc::new(HealthNotifier::with_http_client(NotifierConfig::from_env())?);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime
        .block_on(run(notifier.clone()))
        .map_err(|e| anyhow!("Lambda runtime exited: {}", e))
}

async fn run(notifier: Arc<HealthNotifier>) -> Result<(), lambda_runtime::Error> {
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let notifier = notifier.clone();
        async move { handle_event(notifier, event).await }
    }))
    .await
}

async fn handle_event(notifier: Arc<HealthNotifier>, event: LambdaEvent<Value>) -> Result<(), lambda_runtime::Error> {
    let (payload, context) = event.into_parts();
    info!(request_id = %context.request_id, "Received health event");

    tokio::task::spawn_blocking(move || notifier.handle_value(payload)).await??;
    Ok(())
}
