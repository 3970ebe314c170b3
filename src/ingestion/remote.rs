//! # Remote Fetch Source
//!
//! ## Purpose
//! Fetches extra bill text from a shareable link: extracts the file identifier
//! from the link, downloads the file, and extracts plain text or PDF content.
//!
//! ## Input/Output Specification
//! - **Input**: Shareable link URL (e.g. a Google Drive share link)
//! - **Output**: A single extracted text blob
//! - **Failure Mode**: Unrecognized links, download failures, and oversized or
//!   empty downloads are reported; the document is left unchanged
//!
//! ## Key Features
//! - File id extraction supporting `/d/<id>` and `id=<id>` link forms
//! - Download via a direct-download URL template with the id substituted
//! - Content sniffing: PDF by magic bytes, otherwise UTF-8 text (lossy)
//! - Scoped request timeout from configuration; no retries

use super::{AcquiredText, DocumentSource};
use crate::config::FetchConfig;
use crate::errors::{BillSearchError, Result};
use crate::utils::TextUtils;
use crate::SourceKind;
use async_trait::async_trait;
use regex::Regex;
use std::time::Duration;

/// Extract a file identifier from a shareable link
///
/// Supports the two common forms: a path segment (`.../d/<id>/...`) and a
/// query parameter (`...?id=<id>`).
pub fn extract_file_id(url: &str) -> Result<String> {
    // Compiled per call; link submission is rare and user-driven.
    let path_form = Regex::new(r"/d/([A-Za-z0-9_-]+)").unwrap();
    let query_form = Regex::new(r"[?&]id=([A-Za-z0-9_-]+)").unwrap();

    path_form
        .captures(url)
        .or_else(|| query_form.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| BillSearchError::InvalidShareLink {
            url: url.to_string(),
        })
}

/// A shareable link pending download and extraction
pub struct RemoteSource {
    config: FetchConfig,
    client: reqwest::Client,
    url: String,
}

impl RemoteSource {
    pub fn new(config: FetchConfig, url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| BillSearchError::Internal {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            config,
            client,
            url: url.into(),
        })
    }

    async fn download(&self) -> Result<Vec<u8>> {
        let file_id = extract_file_id(&self.url)?;
        let download_url = self.config.download_url_template.replace("{id}", &file_id);

        tracing::info!(url = %self.url, file_id = %file_id, "Fetching remote file");

        let response = self.client.get(&download_url).send().await.map_err(|e| {
            BillSearchError::RemoteDownloadFailed {
                url: self.url.clone(),
                details: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BillSearchError::RemoteDownloadFailed {
                url: self.url.clone(),
                details: format!("HTTP {}", status),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BillSearchError::RemoteDownloadFailed {
                url: self.url.clone(),
                details: e.to_string(),
            })?;

        let max_bytes = self.config.max_download_size_mb * 1024 * 1024;
        if bytes.len() > max_bytes {
            return Err(BillSearchError::RemoteDownloadFailed {
                url: self.url.clone(),
                details: format!(
                    "Download of {} bytes exceeds limit of {} MB",
                    bytes.len(),
                    self.config.max_download_size_mb
                ),
            });
        }

        Ok(bytes.to_vec())
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let text = if TextUtils::looks_like_pdf(bytes) {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
                BillSearchError::RemoteDownloadFailed {
                    url: self.url.clone(),
                    details: format!("PDF extraction failed: {}", e),
                }
            })?
        } else {
            String::from_utf8_lossy(bytes).into_owned()
        };

        if text.trim().is_empty() {
            return Err(BillSearchError::RemoteDownloadFailed {
                url: self.url.clone(),
                details: "Downloaded file contained no text".to_string(),
            });
        }

        Ok(text)
    }
}

#[async_trait]
impl DocumentSource for RemoteSource {
    fn name(&self) -> &str {
        &self.url
    }

    async fn acquire(&self) -> Result<AcquiredText> {
        let bytes = self.download().await?;
        let text = self.extract(&bytes)?;

        tracing::info!(
            url = %self.url,
            chars = text.chars().count(),
            "Remote file extracted"
        );

        Ok(AcquiredText {
            name: self.url.clone(),
            kind: SourceKind::Remote,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_extract_id_from_path_form() {
        let id =
            extract_file_id("https://drive.google.com/file/d/1AbC_dE-f9/view?usp=sharing").unwrap();
        assert_eq!(id, "1AbC_dE-f9");
    }

    #[test]
    fn test_extract_id_from_query_form() {
        let id = extract_file_id("https://drive.google.com/open?id=XyZ_123-abc").unwrap();
        assert_eq!(id, "XyZ_123-abc");
    }

    #[test]
    fn test_unrecognized_link_is_rejected() {
        let err = extract_file_id("https://example.com/no/identifier/here").unwrap_err();
        assert!(matches!(err, BillSearchError::InvalidShareLink { .. }));
    }

    fn config_for(server: &MockServer) -> FetchConfig {
        FetchConfig {
            download_url_template: format!("{}/files/{{id}}", server.uri()),
            timeout_seconds: 5,
            max_download_size_mb: 1,
        }
    }

    #[tokio::test]
    async fn test_fetch_plain_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_string("TITLE I—AUTHORIZATIONS"))
            .mount(&server)
            .await;

        let source =
            RemoteSource::new(config_for(&server), "https://drive.google.com/open?id=abc123")
                .unwrap();
        let acquired = source.acquire().await.unwrap();
        assert_eq!(acquired.kind, SourceKind::Remote);
        assert_eq!(acquired.text, "TITLE I—AUTHORIZATIONS");
    }

    #[tokio::test]
    async fn test_http_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/abc123"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let source =
            RemoteSource::new(config_for(&server), "https://drive.google.com/open?id=abc123")
                .unwrap();
        let err = source.acquire().await.unwrap_err();
        assert_eq!(err.category(), "acquisition");
        assert!(err.is_user_retryable());
    }

    #[tokio::test]
    async fn test_empty_download_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_string("  \n "))
            .mount(&server)
            .await;

        let source =
            RemoteSource::new(config_for(&server), "https://drive.google.com/open?id=abc123")
                .unwrap();
        assert!(source.acquire().await.is_err());
    }
}
