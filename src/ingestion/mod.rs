//! # Document Ingestion Module
//!
//! ## Purpose
//! Defines the common interface for text sources that can augment the base
//! document, and provides implementations for user uploads and remotely
//! fetched shareable links.
//!
//! ## Input/Output Specification
//! - **Input**: Uploaded file bytes, shareable link URLs
//! - **Output**: A single extracted text blob per source, ready to append to
//!   the current document
//! - **Failure Mode**: Extraction or download failures are reported to the
//!   caller; the existing document is never modified on failure
//!
//! ## Architecture
//! - `DocumentSource` trait: Common interface for all sources
//! - `upload.rs`: Uploaded file extraction (plain text or PDF)
//! - `remote.rs`: Shareable-link fetch and extraction
//! - Future sources can be added by implementing the trait

pub mod remote;
pub mod upload;

use crate::errors::Result;
use crate::SourceKind;
use async_trait::async_trait;

/// Text blob produced by a source, ready to append to the document
#[derive(Debug, Clone)]
pub struct AcquiredText {
    /// Display name (file name or URL)
    pub name: String,
    /// Where the text came from
    pub kind: SourceKind,
    /// The extracted text
    pub text: String,
}

/// Trait for sources that contribute text to the document
///
/// The contract is deliberately narrow: produce a single text blob. The
/// caller concatenates it onto the existing document with a blank-line
/// separator.
#[async_trait]
pub trait DocumentSource {
    /// Display name of this source
    fn name(&self) -> &str;

    /// Acquire the extracted text
    async fn acquire(&self) -> Result<AcquiredText>;
}
