//! 应用程序常量定义
//!
//! 本模块包含全局使用的常量，避免魔数并提供统一的默认值。

/// 远程脚本相关常量
pub mod script {
    /// 默认脚本地址，可在编译时通过 `FETCHRUN_DEFAULT_URL` 覆盖
    pub const DEFAULT_URL: &str = match option_env!("FETCHRUN_DEFAULT_URL") {
        Some(url) => url,
        None => "https://example.com/scripts/Clean.py",
    };
    /// 下载后保存的文件名（相对当前工作目录）
    pub const DEFAULT_ARTIFACT_NAME: &str = "Clean.py";
    /// 按优先级排列的候选解释器
    pub const DEFAULT_INTERPRETERS: &[&str] = &["python3", "python", "py"];
}

/// 网络相关常量
pub mod network {
    /// 连接超时时间（毫秒）
    pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 30000;
    /// 请求头中的 User-Agent
    pub const USER_AGENT: &str = concat!("fetchrun/", env!("CARGO_PKG_VERSION"));
}

/// 配置文件相关常量
pub mod config {
    /// 用户主目录下的配置目录名
    pub const CONFIG_DIR_NAME: &str = ".fetchrun";
    /// 配置文件名
    pub const CONFIG_FILE_NAME: &str = "config.toml";
}

/// 进程退出码
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const FETCH_FAILED: i32 = 1;
    pub const INTERPRETER_NOT_FOUND: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
    /// 解释器存在但无法执行
    pub const CANNOT_EXECUTE: i32 = 126;
    /// 解释器在解析后消失
    pub const COMMAND_NOT_FOUND: i32 = 127;
    /// 子进程被信号终止时的基数（Unix）
    pub const SIGNAL_BASE: i32 = 128;
}

/// 日志相关常量
pub mod log {
    /// 默认日志级别
    pub const DEFAULT_LOG_LEVEL: &str = "warn";
}
