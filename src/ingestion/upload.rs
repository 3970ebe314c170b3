//! # Upload Source
//!
//! ## Purpose
//! Extracts text from a user-uploaded file. Plain text files are decoded as
//! UTF-8 (lossy); PDF files are detected by extension or magic bytes and have
//! their per-page text extracted and newline-joined.
//!
//! ## Input/Output Specification
//! - **Input**: File name and raw bytes
//! - **Output**: A single extracted text blob
//! - **Failure Mode**: PDF extraction failures and empty extractions are
//!   reported; nothing is appended to the document

use super::{AcquiredText, DocumentSource};
use crate::errors::{BillSearchError, Result};
use crate::utils::TextUtils;
use crate::SourceKind;
use async_trait::async_trait;

/// A user-uploaded file pending text extraction
pub struct UploadSource {
    filename: String,
    bytes: Vec<u8>,
}

impl UploadSource {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    fn is_pdf(&self) -> bool {
        self.filename.to_lowercase().ends_with(".pdf") || TextUtils::looks_like_pdf(&self.bytes)
    }

    /// Extract text from the uploaded bytes
    pub fn extract(&self) -> Result<String> {
        let text = if self.is_pdf() {
            // pdf-extract joins per-page text with newlines
            pdf_extract::extract_text_from_mem(&self.bytes).map_err(|e| {
                BillSearchError::UploadExtractionFailed {
                    filename: self.filename.clone(),
                    details: e.to_string(),
                }
            })?
        } else {
            String::from_utf8_lossy(&self.bytes).into_owned()
        };

        if text.trim().is_empty() {
            return Err(BillSearchError::UploadExtractionFailed {
                filename: self.filename.clone(),
                details: "No text could be extracted".to_string(),
            });
        }

        Ok(text)
    }
}

#[async_trait]
impl DocumentSource for UploadSource {
    fn name(&self) -> &str {
        &self.filename
    }

    async fn acquire(&self) -> Result<AcquiredText> {
        let text = self.extract()?;

        tracing::info!(
            filename = %self.filename,
            chars = text.chars().count(),
            "Upload extracted"
        );

        Ok(AcquiredText {
            name: self.filename.clone(),
            kind: SourceKind::Upload,
            text,
        })
    }
}
