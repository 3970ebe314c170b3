//! # Document Store Module
//!
//! ## Purpose
//! Holds the current full bill text for one session: the base document read
//! from disk at process start plus any text appended from uploads or remote
//! fetches. The text is rebuilt by concatenation on every augmentation and is
//! never patched in place.
//!
//! ## Input/Output Specification
//! - **Input**: Base document path, extracted text blobs from sources
//! - **Output**: Immutable document snapshots, source records, statistics
//! - **Lifetime**: One snapshot per session; replaced wholesale on append
//!
//! ## Key Features
//! - Rebuild-by-concatenation with a blank-line separator between sources
//! - Line and paragraph segmentation helpers used by both search components
//! - Source bookkeeping for the stats endpoint
//! - An empty document is legal and simply yields no matches downstream

use crate::config::DocumentConfig;
use crate::errors::{BillSearchError, Result};
use crate::{SourceKind, SourceRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Separator placed between concatenated text sources
const SOURCE_SEPARATOR: &str = "\n\n";

/// Immutable snapshot of the current document text
#[derive(Debug, Clone, Default)]
pub struct Document {
    text: String,
}

impl Document {
    /// Create a snapshot from raw text
    pub fn new(text: String) -> Self {
        Self { text }
    }

    /// Full text of the document
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the document holds any text at all
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Lines of the document, split on newline, original order preserved
    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }

    /// Paragraphs of the document, split on blank-line separators
    pub fn paragraphs(&self) -> Vec<&str> {
        self.text.split("\n\n").collect()
    }

    /// Character count of the full text
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Document statistics exposed by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStats {
    pub total_chars: usize,
    pub total_lines: usize,
    pub total_paragraphs: usize,
    pub sources: Vec<SourceRecord>,
}

/// Session-scoped document store
///
/// Owns the current snapshot and the records of every source that contributed
/// to it. Appending rebuilds the snapshot from the previous text and the new
/// blob; it never mutates the existing snapshot.
#[derive(Debug)]
pub struct DocumentStore {
    document: Document,
    sources: Vec<SourceRecord>,
}

impl DocumentStore {
    /// Create an empty store with no base document
    pub fn empty() -> Self {
        Self {
            document: Document::default(),
            sources: Vec::new(),
        }
    }

    /// Create a store seeded with the base document read from disk
    pub fn from_base_file(config: &DocumentConfig) -> Result<Self> {
        let path: &Path = config.base_path.as_path();
        let text =
            std::fs::read_to_string(path).map_err(|e| BillSearchError::DocumentLoadFailed {
                path: path.to_string_lossy().to_string(),
                details: e.to_string(),
            })?;

        let mut store = Self::empty();
        store.append(
            &path.to_string_lossy(),
            SourceKind::Base,
            text,
        );

        tracing::info!(
            chars = store.document.char_count(),
            path = %path.display(),
            "Base document loaded"
        );

        Ok(store)
    }

    /// Current document snapshot
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Records of every source added this session
    pub fn sources(&self) -> &[SourceRecord] {
        &self.sources
    }

    /// Append a new text source, rebuilding the snapshot by concatenation
    ///
    /// Returns the record for the added source. The previous snapshot is
    /// replaced, not edited; a failure before this point leaves the store
    /// untouched.
    pub fn append(&mut self, name: &str, kind: SourceKind, text: String) -> SourceRecord {
        let chars = text.chars().count();

        let rebuilt = if self.document.is_empty() {
            text
        } else {
            let mut combined =
                String::with_capacity(self.document.text().len() + SOURCE_SEPARATOR.len() + text.len());
            combined.push_str(self.document.text());
            combined.push_str(SOURCE_SEPARATOR);
            combined.push_str(&text);
            combined
        };

        self.document = Document::new(rebuilt);

        let record = SourceRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            kind,
            chars,
            added_at: chrono::Utc::now(),
        };
        self.sources.push(record.clone());

        tracing::info!(
            source = name,
            kind = ?kind,
            chars,
            total_chars = self.document.char_count(),
            "Document augmented"
        );

        record
    }

    /// Current document statistics
    pub fn stats(&self) -> DocumentStats {
        DocumentStats {
            total_chars: self.document.char_count(),
            total_lines: self.document.lines().len(),
            total_paragraphs: self.document.paragraphs().len(),
            sources: self.sources.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DocumentConfig;
    use std::io::Write;

    #[test]
    fn test_empty_document_is_legal() {
        let store = DocumentStore::empty();
        assert!(store.document().is_empty());
        assert_eq!(store.stats().total_chars, 0);
        assert!(store.sources().is_empty());
    }

    #[test]
    fn test_append_rebuilds_with_blank_line_separator() {
        let mut store = DocumentStore::empty();
        store.append("bill.txt", SourceKind::Base, "section one".to_string());
        store.append("extra.txt", SourceKind::Upload, "section two".to_string());

        assert_eq!(store.document().text(), "section one\n\nsection two");
        assert_eq!(store.sources().len(), 2);
        assert_eq!(store.sources()[1].kind, SourceKind::Upload);
    }

    #[test]
    fn test_first_append_has_no_leading_separator() {
        let mut store = DocumentStore::empty();
        store.append("bill.txt", SourceKind::Base, "only text".to_string());
        assert_eq!(store.document().text(), "only text");
    }

    #[test]
    fn test_from_base_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "SEC. 1. SHORT TITLE.").unwrap();
        write!(file, "This Act may be cited as the FAA Reauthorization Act.").unwrap();

        let config = DocumentConfig {
            base_path: file.path().to_path_buf(),
            title: "test".to_string(),
        };

        let store = DocumentStore::from_base_file(&config).unwrap();
        assert!(!store.document().is_empty());
        assert_eq!(store.sources().len(), 1);
        assert_eq!(store.sources()[0].kind, SourceKind::Base);
    }

    #[test]
    fn test_missing_base_file_is_reported() {
        let config = DocumentConfig {
            base_path: "/nonexistent/bill.txt".into(),
            title: "test".to_string(),
        };
        let err = DocumentStore::from_base_file(&config).unwrap_err();
        assert_eq!(err.category(), "document");
    }

    #[test]
    fn test_segmentation_views() {
        let doc = Document::new("a\nb\n\nc".to_string());
        assert_eq!(doc.lines(), vec!["a", "b", "", "c"]);
        assert_eq!(doc.paragraphs(), vec!["a\nb", "c"]);
    }
}
