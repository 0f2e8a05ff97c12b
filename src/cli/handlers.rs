use tracing::{debug, info};

use crate::cli::commands::Cli;
use crate::core::runner::{RunnerSettings, ScriptRunner};
use crate::error::{AppError, ContextualResult};
use crate::infrastructure::config::{validate_sha256, validate_url, RunnerConfig};

/// 命令处理器
pub struct CommandHandler {
    cli: Cli,
}

impl CommandHandler {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// 合并配置文件与命令行参数，命令行优先
    pub fn settings(&self) -> ContextualResult<RunnerSettings> {
        let operation = "加载配置";
        let config = RunnerConfig::load(self.cli.config.as_deref())
            .map_err(|e| e.with_context(operation))?;
        let mut settings = RunnerSettings::from(config);

        if let Some(url) = &self.cli.url {
            validate_url(url).map_err(|e| AppError::config(e).with_context(operation))?;
            settings.url = url.clone();
        }
        if let Some(output) = &self.cli.output {
            settings.destination = output.clone();
        }
        if !self.cli.interpreters.is_empty() {
            settings.interpreters = self.cli.interpreters.clone();
        }
        if let Some(sha256) = &self.cli.sha256 {
            validate_sha256(sha256).map_err(|e| AppError::config(e).with_context(operation))?;
            settings.expected_sha256 = Some(sha256.clone());
        }
        if !self.cli.script_args.is_empty() {
            settings.args = self.cli.script_args.clone();
        }
        settings.show_progress = !self.cli.quiet;

        debug!(?settings, "运行参数");
        Ok(settings)
    }

    /// 处理命令，返回进程退出码
    pub async fn handle(&self) -> i32 {
        match self.run().await {
            Ok(code) => code,
            Err(e) => {
                eprint!("{}", e.user_message());
                e.exit_code()
            }
        }
    }

    async fn run(&self) -> ContextualResult<i32> {
        let settings = self.settings()?;
        let runner = ScriptRunner::new(settings).map_err(|e| e.with_context("初始化"))?;
        let outcome = runner.run().await?;

        info!(
            artifact = %outcome.artifact.display(),
            interpreter = %outcome.interpreter.name,
            exit_code = outcome.exit_code,
            "完成"
        );
        Ok(outcome.exit_code)
    }
}
