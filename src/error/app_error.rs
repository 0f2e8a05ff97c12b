use std::io;
use thiserror::Error;

use crate::core::constants::exit_codes;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO 错误: {0}")]
    Io(#[from] io::Error),

    #[error("配置错误: {message}")]
    Config { message: String },

    /// 网络请求失败或服务器返回非成功状态码
    #[error("下载失败: {message} (URL: {url})")]
    Fetch {
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("SHA256 校验失败: 期望 {expected}, 实际 {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("未找到可用的解释器 (已尝试: {})", candidates.join(", "))]
    InterpreterNotFound { candidates: Vec<String> },

    /// 解释器进程无法启动
    #[error("无法启动解释器 {interpreter}: {source}")]
    ChildExecution {
        interpreter: String,
        #[source]
        source: io::Error,
    },
}

/// 应用程序 Result 类型
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn fetch(url: &str, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.to_string(),
            status: None,
            message: message.into(),
        }
    }

    pub fn fetch_status(url: &str, status: u16) -> Self {
        Self::Fetch {
            url: url.to_string(),
            status: Some(status),
            message: format!("服务器返回状态码: {}", status),
        }
    }

    /// 进程退出码
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Fetch { .. } | AppError::ChecksumMismatch { .. } => exit_codes::FETCH_FAILED,
            AppError::InterpreterNotFound { .. } => exit_codes::INTERPRETER_NOT_FOUND,
            AppError::Config { .. } => exit_codes::CONFIG_ERROR,
            AppError::ChildExecution { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                exit_codes::COMMAND_NOT_FOUND
            }
            AppError::ChildExecution { .. } => exit_codes::CANNOT_EXECUTE,
            AppError::Io(_) => exit_codes::FAILURE,
        }
    }
}
