use std::ffi::OsString;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

use crate::core::constants::exit_codes;
use crate::error::{AppError, AppResult};

/// 为脚本添加读取与执行权限（chmod +x）
#[cfg(unix)]
pub fn mark_executable(path: &Path) -> AppResult<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = std::fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o755);
    std::fs::set_permissions(path, permissions)?;
    Ok(())
}

/// 没有权限位的平台上不做任何处理
#[cfg(not(unix))]
pub fn mark_executable(path: &Path) -> AppResult<()> {
    std::fs::metadata(path)?;
    Ok(())
}

/// 使用解释器运行脚本，继承标准输入输出，返回子进程退出码
pub async fn execute(interpreter: &Path, script: &Path, args: &[OsString]) -> AppResult<i32> {
    let status = Command::new(interpreter)
        .arg(script)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|source| AppError::ChildExecution {
            interpreter: interpreter.display().to_string(),
            source,
        })?;

    Ok(exit_code_of(status))
}

/// 子进程退出码，被信号终止时为 128 + 信号值
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return exit_codes::SIGNAL_BASE + signal;
        }
    }

    exit_codes::FAILURE
}
