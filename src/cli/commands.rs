use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// fetchrun CLI 应用程序
///
/// 不带任何参数时，下载默认脚本并用第一个可用的 Python 解释器执行。
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "fetchrun")]
#[command(about = "下载远程脚本并使用本机解释器执行", long_about = None)]
#[command(version)]
pub struct Cli {
    /// 远程脚本地址
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// 脚本保存路径
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// 候选解释器（可重复，按顺序检查，替换默认列表）
    #[arg(short, long = "interpreter", value_name = "NAME")]
    pub interpreters: Vec<String>,

    /// 期望的脚本 SHA256
    #[arg(long, value_name = "HEX")]
    pub sha256: Option<String>,

    /// 配置文件路径
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// 输出更多日志（可重复）
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// 只输出错误
    #[arg(short, long)]
    pub quiet: bool,

    /// 传递给脚本的参数
    #[arg(last = true, value_name = "ARGS")]
    pub script_args: Vec<OsString>,
}

impl Cli {
    /// 日志过滤级别
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => crate::core::constants::log::DEFAULT_LOG_LEVEL,
            1 => "info",
            _ => "debug",
        }
    }
}
