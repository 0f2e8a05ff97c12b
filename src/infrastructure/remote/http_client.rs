use reqwest::{Client, Response};
use std::time::Duration;

use crate::core::constants::network::{DEFAULT_CONNECT_TIMEOUT_MS, USER_AGENT};
use crate::error::{AppError, AppResult};

/// HTTP 客户端包装器
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// 创建新的 HTTP 客户端
    ///
    /// 只设置连接超时，下载本身不设总超时。
    pub fn new() -> AppResult<Self> {
        let client = Self::builder()
            .build()
            .map_err(|e| AppError::config(format!("创建 HTTP 客户端失败: {e}")))?;
        Ok(Self { client })
    }

    /// 不经过系统代理的客户端，用于访问本机地址
    pub fn direct() -> AppResult<Self> {
        let client = Self::builder()
            .no_proxy()
            .build()
            .map_err(|e| AppError::config(format!("创建 HTTP 客户端失败: {e}")))?;
        Ok(Self { client })
    }

    fn builder() -> reqwest::ClientBuilder {
        Client::builder()
            .connect_timeout(Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS))
            .user_agent(USER_AGENT)
    }

    /// GET 请求，非 2xx 状态码视为失败
    pub async fn get(&self, url: &str) -> AppResult<Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::fetch(url, describe_transport_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch_status(url, status.as_u16()));
        }

        Ok(response)
    }
}

fn describe_transport_error(error: &reqwest::Error) -> String {
    let error_msg = error.to_string();
    if error.is_timeout() {
        format!("连接超时: {}", error_msg)
    } else if error.is_connect() {
        format!("无法建立连接: {}", error_msg)
    } else if error_msg.contains("dns") || error_msg.contains("resolve") {
        format!("DNS 解析失败: {}", error_msg)
    } else {
        format!("网络请求失败: {}", error_msg)
    }
}

/// 提供网络问题的解决建议
pub fn provide_suggestions(error: &str) -> Vec<String> {
    let error = error.to_lowercase();
    let mut suggestions = Vec::new();

    if error.contains("dns") || error.contains("resolve") {
        suggestions.push("尝试更换 DNS 服务器（如 8.8.8.8 或 1.1.1.1）".to_string());
        suggestions.push("检查 hosts 文件是否被修改".to_string());
    }

    if error.contains("超时") || error.contains("timeout") || error.contains("timed out") {
        suggestions.push("检查防火墙设置".to_string());
        suggestions.push("确认网络代理配置正确".to_string());
    }

    if error.contains("connection closed") || error.contains("reset") || error.contains("无法建立连接") {
        suggestions.push("网络连接不稳定，请稍后重试".to_string());
    }

    if error.contains("ssl") || error.contains("tls") || error.contains("certificate") {
        suggestions.push("更新系统证书".to_string());
        suggestions.push("检查系统时间是否正确".to_string());
    }

    if suggestions.is_empty() {
        suggestions.push("检查网络连接后重试".to_string());
        suggestions.push("使用 --url 指定可访问的脚本地址".to_string());
    }

    suggestions
}
