// 核心模块
pub mod cli;
pub mod core;
pub mod error;
pub mod infrastructure;

pub use cli::*;
pub use error::*;
pub use infrastructure::*;
pub use core::runner::{RunOutcome, RunStep, RunnerSettings, ScriptRunner};
// 使用命名空间导入常量，避免冲突
pub use core::constants as app_constants;
