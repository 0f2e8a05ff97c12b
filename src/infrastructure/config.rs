use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::core::constants::{config as config_consts, script};
use crate::error::{AppError, AppResult};

/// 配置文件结构
///
/// 每个字段都有默认值，缺省的配置文件等价于空文件。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    /// 远程脚本地址
    #[serde(default = "default_url")]
    pub url: String,
    /// 下载后保存的路径（相对当前工作目录）
    #[serde(default = "default_destination")]
    pub destination: PathBuf,
    /// 按优先级排列的候选解释器
    #[serde(default = "default_interpreters")]
    pub interpreters: Vec<String>,
    /// 追加在脚本路径之后的参数
    #[serde(default)]
    pub args: Vec<String>,
    /// 期望的脚本 SHA256，未设置时不校验
    #[serde(default)]
    pub sha256: Option<String>,
}

fn default_url() -> String {
    script::DEFAULT_URL.to_string()
}

fn default_destination() -> PathBuf {
    PathBuf::from(script::DEFAULT_ARTIFACT_NAME)
}

fn default_interpreters() -> Vec<String> {
    script::DEFAULT_INTERPRETERS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            destination: default_destination(),
            interpreters: default_interpreters(),
            args: Vec::new(),
            sha256: None,
        }
    }
}

impl RunnerConfig {
    /// 加载配置
    ///
    /// 显式指定的路径必须存在；否则读取默认路径，文件不存在时使用默认配置。
    pub fn load(explicit: Option<&Path>) -> AppResult<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match get_config_path() {
                Some(path) if path.is_file() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// 从文件加载配置
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("无法读取配置文件 {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
            .map_err(|e| AppError::config(format!("{} ({})", e, path.display())))
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        let config: Self =
            toml::from_str(content).map_err(|e| format!("解析配置文件失败: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), String> {
        validate_url(&self.url)?;

        if self.destination.as_os_str().is_empty() {
            return Err("destination 不能为空".to_string());
        }
        if self.interpreters.is_empty() || self.interpreters.iter().any(|i| i.trim().is_empty()) {
            return Err("interpreters 至少包含一个非空候选".to_string());
        }
        if let Some(sha256) = &self.sha256 {
            validate_sha256(sha256)?;
        }
        Ok(())
    }
}

pub fn validate_url(value: &str) -> Result<(), String> {
    let url = Url::parse(value).map_err(|e| format!("无效的 URL '{}': {}", value, e))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("不支持的 URL 协议 '{}': {}", other, value)),
    }
}

pub fn validate_sha256(value: &str) -> Result<(), String> {
    if value.len() == 64 && value.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(format!("无效的 SHA256 值: {}", value))
    }
}

/// 获取默认配置文件路径
pub fn get_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join(config_consts::CONFIG_DIR_NAME)
            .join(config_consts::CONFIG_FILE_NAME)
    })
}
