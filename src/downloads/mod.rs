//! File-download collaborator

use async_trait::async_trait;
use reqwest::Client;
use std::path::{Path, PathBuf};

use crate::error::{SyncError, SyncResult};

/// Receives a download URL and stores the file somewhere
#[async_trait]
pub trait FileDownloader: Send + Sync {
    async fn download(&self, url: &str) -> SyncResult<PathBuf>;
}

/// Downloads over HTTP into a local directory
pub struct HttpFileDownloader {
    client: Client,
    dir: PathBuf,
}

impl HttpFileDownloader {
    pub fn new(client: Client, dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl FileDownloader for HttpFileDownloader {
    async fn download(&self, url: &str) -> SyncResult<PathBuf> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::from_response(status, &body));
        }
        let bytes = response.bytes().await?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(file_name_from_url(url));
        tokio::fs::write(&path, &bytes).await?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "Document downloaded");
        Ok(path)
    }
}

/// Last path segment of `url`, stripped of query/fragment and of anything
/// that could escape the target directory
pub fn file_name_from_url(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    let name: String = without_query
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();

    let name = name.trim_start_matches('.');
    if name.is_empty() {
        "document.pdf".to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(
            file_name_from_url("https://cdn.example.com/kyc/signed-123.pdf?token=abc"),
            "signed-123.pdf"
        );
        assert_eq!(file_name_from_url("https://cdn.example.com/"), "document.pdf");
        assert_eq!(file_name_from_url("https://x/..%2F..%2Fetc"), "2F..2Fetc");
        assert_eq!(file_name_from_url("https://x/.."), "document.pdf");
    }
}
