use clap::Parser;
use fetchrun::cli::{Cli, CommandHandler};
use std::process;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // 日志输出到 stderr，保持脚本的 stdout 干净
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    let code = CommandHandler::new(cli).handle().await;
    process::exit(code);
}
