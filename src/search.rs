//! # Keyword Context Search Module
//!
//! ## Purpose
//! Finds every line of the document containing the query as a case-insensitive
//! substring and returns each hit wrapped in a context window of neighboring
//! lines, in ascending line order.
//!
//! ## Input/Output Specification
//! - **Input**: Document text, query string
//! - **Output**: Ordered sequence of context windows (possibly empty)
//! - **Determinism**: Pure function over its inputs; no I/O, no caching
//!
//! ## Key Features
//! - Case-insensitive substring matching, no stemming or normalization beyond
//!   lowercasing
//! - Context window of N lines before and after the hit, clamped at document
//!   boundaries (N defaults to 2)
//! - Overlapping windows from adjacent hits are all emitted; nothing is merged
//!   or de-duplicated
//! - No ranking or relevance scoring

use crate::config::SearchConfig;
use crate::errors::{BillSearchError, Result};
use serde::{Deserialize, Serialize};

/// A single keyword hit with its surrounding context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchWindow {
    /// Index of the matching line in the document
    pub line_index: usize,
    /// Index of the first line included in the window
    pub window_start: usize,
    /// The matching line plus its neighbors, joined by newline
    pub text: String,
}

/// Keyword context search engine
pub struct KeywordSearch {
    config: SearchConfig,
}

impl KeywordSearch {
    /// Create a searcher with the given configuration
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Find every context window around a case-insensitive substring hit
    ///
    /// An empty query produces no results; callers distinguish that state from
    /// a query with zero matches for their own messaging. Windows are emitted
    /// in hit order, and a line containing a match is never skipped even if a
    /// neighboring window already covers it.
    pub fn search(&self, document: &str, query: &str) -> Vec<MatchWindow> {
        if query.is_empty() {
            return Vec::new();
        }

        let needle = query.to_lowercase();
        let lines: Vec<&str> = document.split('\n').collect();
        let last = lines.len().saturating_sub(1);
        let radius = self.config.context_lines;

        let mut windows = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            if line.to_lowercase().contains(&needle) {
                let start = i.saturating_sub(radius);
                let end = (i + radius).min(last);
                windows.push(MatchWindow {
                    line_index: i,
                    window_start: start,
                    text: lines[start..=end].join("\n"),
                });
            }
        }

        tracing::debug!(
            query = %query,
            hits = windows.len(),
            "Keyword search completed"
        );

        windows
    }

    /// Validate a query before searching
    pub fn validate_query(&self, query: &str) -> Result<()> {
        if query.len() > self.config.max_query_length {
            return Err(BillSearchError::InvalidApiRequest {
                details: format!(
                    "Query too long: maximum {} characters",
                    self.config.max_query_length
                ),
            });
        }
        Ok(())
    }
}
