use thiserror::Error;

use super::app_error::AppError;
use crate::infrastructure::remote::http_client::provide_suggestions;

/// 用于提供错误上下文和用户友好建议
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub operation: String,
    pub suggestions: Vec<String>,
    pub help_url: Option<String>,
}

/// 带有上下文的错误
#[derive(Error, Debug)]
pub struct ContextualError {
    #[source]
    pub error: AppError,
    pub context: ErrorContext,
}

impl std::fmt::Display for ContextualError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "操作失败: {}\n错误: {}", self.context.operation, self.error)
    }
}

impl AppError {
    /// 为错误添加上下文信息，并根据错误类型附带建议
    pub fn with_context(self, operation: &str) -> ContextualError {
        let (suggestions, help_url) = default_guidance(&self);
        ContextualError {
            error: self,
            context: ErrorContext {
                operation: operation.to_string(),
                suggestions,
                help_url,
            },
        }
    }
}

fn default_guidance(error: &AppError) -> (Vec<String>, Option<String>) {
    match error {
        AppError::Fetch { status: Some(_), .. } => (
            vec![
                "确认脚本 URL 是否正确".to_string(),
                "使用 --url 或配置文件中的 url 指定其他地址".to_string(),
            ],
            None,
        ),
        AppError::Fetch { message, .. } => (provide_suggestions(message), None),
        AppError::ChecksumMismatch { .. } => (
            vec![
                "远程脚本内容已变化，请确认来源可信后更新 sha256".to_string(),
                "不要执行来源不明的脚本".to_string(),
            ],
            None,
        ),
        AppError::InterpreterNotFound { .. } => (
            vec![
                "安装 Python 3 并确保其位于 PATH 中".to_string(),
                "Debian/Ubuntu: sudo apt install python3".to_string(),
                "macOS: brew install python".to_string(),
                "Windows: winget install Python.Python.3".to_string(),
                "或使用 --interpreter 指定解释器路径".to_string(),
            ],
            Some("https://www.python.org/downloads/".to_string()),
        ),
        AppError::ChildExecution { .. } => (
            vec!["检查解释器文件的执行权限".to_string()],
            None,
        ),
        AppError::Config { .. } => (
            vec!["检查配置文件 ~/.fetchrun/config.toml 的格式".to_string()],
            None,
        ),
        AppError::Io(_) => (vec!["检查当前目录是否可写".to_string()], None),
    }
}

impl ContextualError {
    /// 进程退出码
    pub fn exit_code(&self) -> i32 {
        self.error.exit_code()
    }

    /// 获取用户友好的错误消息
    pub fn user_message(&self) -> String {
        let mut msg = format!("❌ {}\n", self.context.operation);
        msg.push_str(&format!("原因: {}\n", self.error));

        if !self.context.suggestions.is_empty() {
            msg.push_str("💡 建议:\n");
            for suggestion in &self.context.suggestions {
                msg.push_str(&format!("  • {}\n", suggestion));
            }
        }

        if let Some(help_url) = &self.context.help_url {
            msg.push_str(&format!("📖 更多帮助: {}\n", help_url));
        }

        msg
    }
}

pub type ContextualResult<T> = Result<T, ContextualError>;

/// 为Result添加上下文信息的辅助函数
pub fn with_context<T, E: Into<AppError>>(
    result: Result<T, E>,
    operation: &str,
) -> ContextualResult<T> {
    result.map_err(|e| e.into().with_context(operation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpreter_not_found_has_install_guidance() {
        let err = AppError::InterpreterNotFound {
            candidates: vec!["python3".into()],
        }
        .with_context("检查解释器");

        let msg = err.user_message();
        assert!(msg.contains("检查解释器"));
        assert!(msg.contains("python3"));
        assert!(msg.contains("apt install python3"));
        assert!(msg.contains("https://www.python.org/downloads/"));
    }

    #[test]
    fn test_with_context_keeps_exit_code() {
        let result: Result<(), AppError> = Err(AppError::fetch_status("http://x/a.py", 404));
        let err = with_context(result, "下载脚本").unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.context.operation, "下载脚本");
    }

    #[test]
    fn test_io_error_converts() {
        let result: Result<(), std::io::Error> =
            Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        let err = with_context(result, "写入脚本").unwrap_err();
        assert!(matches!(err.error, AppError::Io(_)));
    }
}
