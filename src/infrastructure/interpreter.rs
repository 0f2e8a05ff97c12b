//! 解释器解析
//!
//! 候选解释器按优先级排列，每个候选都是一个 [`InterpreterResolver`]，
//! 依次检查，返回第一个可用的解释器路径。

use std::path::{Path, PathBuf};
use tracing::debug;
use which::which;

use crate::error::{AppError, AppResult};

/// 单个候选解释器的检查能力
pub trait InterpreterResolver: Send + Sync {
    /// 用于提示信息的候选名称
    fn name(&self) -> &str;

    /// 返回可执行文件路径，不可用时返回 None
    fn locate(&self) -> Option<PathBuf>;
}

/// 在 PATH 中查找的候选
#[derive(Debug, Clone)]
pub struct PathLookup {
    program: String,
}

impl PathLookup {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl InterpreterResolver for PathLookup {
    fn name(&self) -> &str {
        &self.program
    }

    fn locate(&self) -> Option<PathBuf> {
        which(&self.program).ok()
    }
}

/// 显式指定路径的候选
#[derive(Debug, Clone)]
pub struct ExplicitPath {
    path: PathBuf,
    label: String,
}

impl ExplicitPath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let label = path.display().to_string();
        Self { path, label }
    }
}

impl InterpreterResolver for ExplicitPath {
    fn name(&self) -> &str {
        &self.label
    }

    fn locate(&self) -> Option<PathBuf> {
        self.path.is_file().then(|| self.path.clone())
    }
}

/// 含路径分隔符的候选视为显式路径，否则在 PATH 中查找
pub fn resolver_for(candidate: &str) -> Box<dyn InterpreterResolver> {
    let has_separator = candidate.contains('/') || candidate.contains(std::path::MAIN_SEPARATOR);
    if has_separator || Path::new(candidate).is_absolute() {
        Box::new(ExplicitPath::new(candidate))
    } else {
        Box::new(PathLookup::new(candidate))
    }
}

/// 已解析的解释器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInterpreter {
    pub name: String,
    pub path: PathBuf,
}

/// 按优先级排列的候选解释器
#[derive(Default)]
pub struct InterpreterChain {
    resolvers: Vec<Box<dyn InterpreterResolver>>,
}

impl InterpreterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_candidates<S: AsRef<str>>(candidates: &[S]) -> Self {
        Self {
            resolvers: candidates.iter().map(|c| resolver_for(c.as_ref())).collect(),
        }
    }

    /// 追加一个优先级更低的候选
    pub fn push(&mut self, resolver: Box<dyn InterpreterResolver>) {
        self.resolvers.push(resolver);
    }

    pub fn candidates(&self) -> Vec<String> {
        self.resolvers.iter().map(|r| r.name().to_string()).collect()
    }

    /// 返回第一个可用的候选，全部不可用时报错
    pub fn ensure_available(&self) -> AppResult<ResolvedInterpreter> {
        for resolver in &self.resolvers {
            match resolver.locate() {
                Some(path) => {
                    debug!(candidate = resolver.name(), path = %path.display(), "找到解释器");
                    return Ok(ResolvedInterpreter {
                        name: resolver.name().to_string(),
                        path,
                    });
                }
                None => debug!(candidate = resolver.name(), "候选解释器不可用"),
            }
        }

        Err(AppError::InterpreterNotFound {
            candidates: self.candidates(),
        })
    }
}
