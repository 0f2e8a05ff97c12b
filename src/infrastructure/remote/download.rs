use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::http_client::HttpClient;
use crate::error::{AppError, AppResult};

/// 下载选项
#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    pub expected_sha256: Option<String>,
    pub show_progress: bool,
}

/// 已落盘的下载结果
#[derive(Debug, Clone)]
pub struct FetchedArtifact {
    pub path: PathBuf,
    pub bytes: u64,
    pub sha256: String,
}

pub fn create_progress_bar(total_size: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    if total_size == 0 {
        return ProgressBar::new_spinner();
    }

    let pb = ProgressBar::new(total_size);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta}) {percent}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

/// 目标文件所在目录，裸文件名时为当前目录
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// 下载到目标文件
///
/// 内容先写入同目录下的临时文件，完整接收（且校验通过）后才重命名覆盖目标文件。
/// 任何失败都会删除临时文件，已有的目标文件保持不变。
pub async fn download_to_file(
    client: &HttpClient,
    url: &str,
    file_path: &Path,
    options: &DownloadOptions,
) -> AppResult<FetchedArtifact> {
    let response = client.get(url).await?;
    let total_size = response.content_length().unwrap_or(0);
    debug!(url, total_size, "开始接收响应");

    let dir = parent_dir(file_path);
    tokio::fs::create_dir_all(dir).await?;
    let temp = tempfile::Builder::new()
        .prefix(".fetchrun-")
        .suffix(".part")
        .tempfile_in(dir)?;
    let mut file = tokio::fs::File::from_std(temp.as_file().try_clone()?);

    let pb = create_progress_bar(total_size, options.show_progress);
    let mut hasher = Sha256::new();
    let mut downloaded = 0u64;
    let mut stream = response.bytes_stream();

    let received = async {
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| AppError::fetch(url, format!("读取数据失败: {e}")))?;
            hasher.update(&chunk);
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            pb.set_position(downloaded);
        }
        file.flush().await?;
        file.sync_all().await?;
        Ok::<(), AppError>(())
    }
    .await;
    pb.finish_and_clear();
    received?;
    drop(file);

    let actual = hex::encode(hasher.finalize());
    if let Some(expected) = &options.expected_sha256 {
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(AppError::ChecksumMismatch {
                expected: expected.clone(),
                actual,
            });
        }
        debug!("SHA256 校验通过");
    }

    temp.persist(file_path).map_err(|e| AppError::Io(e.error))?;

    Ok(FetchedArtifact {
        path: file_path.to_path_buf(),
        bytes: downloaded,
        sha256: actual,
    })
}

/// 确认下载结果已完整写入磁盘
pub fn verify_artifact(artifact: &FetchedArtifact) -> AppResult<()> {
    let metadata = std::fs::metadata(&artifact.path)?;
    if !metadata.is_file() {
        return Err(AppError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{} 不是普通文件", artifact.path.display()),
        )));
    }
    if metadata.len() != artifact.bytes {
        return Err(AppError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!(
                "文件大小不一致: 期望 {} 字节, 实际 {} 字节",
                artifact.bytes,
                metadata.len()
            ),
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::remote::test_server::serve_once;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_download_writes_body_exactly() {
        let body = b"print(\"ok\")\n\x00\xff\xfe".to_vec();
        let url = serve_once(200, "OK", body.clone()).await;
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("Clean.py");

        let client = HttpClient::direct().unwrap();
        let artifact = download_to_file(&client, &url, &dest, &DownloadOptions::default())
            .await
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), body);
        assert_eq!(artifact.bytes, body.len() as u64);
        assert_eq!(artifact.sha256, hex::encode(Sha256::digest(&body)));
        verify_artifact(&artifact).unwrap();
        assert_eq!(entries(dir.path()), vec!["Clean.py".to_string()]);
    }

    #[tokio::test]
    async fn test_download_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("Clean.py");
        std::fs::write(&dest, "an older and much longer script body").unwrap();

        let url = serve_once(200, "OK", b"new".to_vec()).await;
        let client = HttpClient::direct().unwrap();
        download_to_file(&client, &url, &dest, &DownloadOptions::default())
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_failed_download_leaves_no_partial_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("Clean.py");
        std::fs::write(&dest, "previous").unwrap();

        let url = serve_once(404, "Not Found", b"not here".to_vec()).await;
        let client = HttpClient::direct().unwrap();
        let result = download_to_file(&client, &url, &dest, &DownloadOptions::default()).await;

        assert!(matches!(result, Err(AppError::Fetch { status: Some(404), .. })));
        assert_eq!(entries(dir.path()), vec!["Clean.py".to_string()]);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "previous");
    }

    #[tokio::test]
    async fn test_checksum_mismatch_rejects_artifact() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("Clean.py");
        let url = serve_once(200, "OK", b"tampered".to_vec()).await;

        let options = DownloadOptions {
            expected_sha256: Some(hex::encode(Sha256::digest(b"original"))),
            show_progress: false,
        };
        let client = HttpClient::direct().unwrap();
        let result = download_to_file(&client, &url, &dest, &options).await;

        assert!(matches!(result, Err(AppError::ChecksumMismatch { .. })));
        assert!(entries(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_checksum_match_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("Clean.py");
        let url = serve_once(200, "OK", b"original".to_vec()).await;

        let options = DownloadOptions {
            expected_sha256: Some(hex::encode_upper(Sha256::digest(b"original"))),
            show_progress: false,
        };
        let client = HttpClient::direct().unwrap();
        download_to_file(&client, &url, &dest, &options).await.unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "original");
    }

    #[test]
    fn test_verify_artifact_detects_size_mismatch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Clean.py");
        std::fs::write(&path, "short").unwrap();

        let artifact = FetchedArtifact {
            path,
            bytes: 100,
            sha256: String::new(),
        };
        assert!(verify_artifact(&artifact).is_err());
    }

    #[test]
    fn test_parent_dir_of_bare_file_name() {
        assert_eq!(parent_dir(Path::new("Clean.py")), Path::new("."));
        assert_eq!(parent_dir(Path::new("scripts/Clean.py")), Path::new("scripts"));
    }
}
