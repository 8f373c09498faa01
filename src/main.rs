//! Chime Notifier
//!
//! 把 AWS Health 事件转发到 Amazon Chime 聊天室

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use chime_notifier::cli::{handle_invoke, handle_serve, InvokeArgs};

#[derive(Parser)]
#[command(name = "chime-notifier")]
#[command(about = "Chime Notifier - 把 AWS Health 事件转发到 Chime")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// 作为 Lambda 函数运行（默认）
    Serve,
    /// 在本地处理单个事件
    Invoke(InvokeArgs),
}

fn main() -> Result<()> {
    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("chime_notifier=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => handle_serve(),
        Commands::Invoke(args) => handle_invoke(args),
    }
}
