//! 远程脚本运行器
//!
//! 严格按顺序执行：下载 → 校验下载 → 检查解释器 → 设置执行权限 → 执行。
//! 任一步骤失败都会跳过其后的所有步骤。

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::error::{with_context, AppResult, ContextualResult};
use crate::infrastructure::config::RunnerConfig;
use crate::infrastructure::interpreter::{InterpreterChain, ResolvedInterpreter};
use crate::infrastructure::process::{execute, mark_executable};
use crate::infrastructure::remote::download::{download_to_file, verify_artifact, DownloadOptions};
use crate::infrastructure::remote::http_client::HttpClient;

/// 启动时确定的运行参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerSettings {
    pub url: String,
    pub destination: PathBuf,
    pub interpreters: Vec<String>,
    pub args: Vec<OsString>,
    pub expected_sha256: Option<String>,
    pub show_progress: bool,
}

impl From<RunnerConfig> for RunnerSettings {
    fn from(config: RunnerConfig) -> Self {
        Self {
            url: config.url,
            destination: config.destination,
            interpreters: config.interpreters,
            args: config.args.into_iter().map(OsString::from).collect(),
            expected_sha256: config.sha256,
            show_progress: false,
        }
    }
}

/// 运行步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStep {
    Fetch,
    VerifyFetch,
    EnsureInterpreter,
    MarkExecutable,
    Execute,
}

impl fmt::Display for RunStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RunStep::Fetch => "下载远程脚本",
            RunStep::VerifyFetch => "校验下载结果",
            RunStep::EnsureInterpreter => "检查解释器",
            RunStep::MarkExecutable => "设置执行权限",
            RunStep::Execute => "执行脚本",
        };
        f.write_str(text)
    }
}

/// 运行结果
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub artifact: PathBuf,
    pub interpreter: ResolvedInterpreter,
    pub exit_code: i32,
}

pub struct ScriptRunner {
    settings: RunnerSettings,
    client: HttpClient,
    interpreters: InterpreterChain,
}

impl ScriptRunner {
    pub fn new(settings: RunnerSettings) -> AppResult<Self> {
        let client = HttpClient::new()?;
        let interpreters = InterpreterChain::from_candidates(&settings.interpreters);
        Ok(Self::with_parts(settings, client, interpreters))
    }

    pub fn with_parts(
        settings: RunnerSettings,
        client: HttpClient,
        interpreters: InterpreterChain,
    ) -> Self {
        Self {
            settings,
            client,
            interpreters,
        }
    }

    pub fn settings(&self) -> &RunnerSettings {
        &self.settings
    }

    pub async fn run(&self) -> ContextualResult<RunOutcome> {
        let settings = &self.settings;

        info!(step = %RunStep::Fetch, url = %settings.url, destination = %settings.destination.display());
        let options = DownloadOptions {
            expected_sha256: settings.expected_sha256.clone(),
            show_progress: settings.show_progress,
        };
        let artifact = with_context(
            download_to_file(&self.client, &settings.url, &settings.destination, &options).await,
            &RunStep::Fetch.to_string(),
        )?;

        info!(step = %RunStep::VerifyFetch, bytes = artifact.bytes, sha256 = %artifact.sha256);
        with_context(verify_artifact(&artifact), &RunStep::VerifyFetch.to_string())?;
        if settings.expected_sha256.is_none() {
            warn!(
                sha256 = %artifact.sha256,
                "未配置 sha256，脚本内容将在未经校验的情况下执行"
            );
        }

        info!(step = %RunStep::EnsureInterpreter, candidates = ?settings.interpreters);
        let interpreter = with_context(
            self.interpreters.ensure_available(),
            &RunStep::EnsureInterpreter.to_string(),
        )?;

        info!(step = %RunStep::MarkExecutable, path = %artifact.path.display());
        with_context(
            mark_executable(&artifact.path),
            &RunStep::MarkExecutable.to_string(),
        )?;

        info!(step = %RunStep::Execute, interpreter = %interpreter.path.display());
        let exit_code = with_context(
            execute(&interpreter.path, &artifact.path, &settings.args).await,
            &RunStep::Execute.to_string(),
        )?;
        info!(exit_code, "脚本执行结束");

        Ok(RunOutcome {
            artifact: artifact.path,
            interpreter,
            exit_code,
        })
    }
}
