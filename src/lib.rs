//! # Bill Context Search Service
//!
//! ## Overview
//! This library implements an interactive search service for a legislative
//! bill: keyword search with surrounding line context, document augmentation
//! from uploads and remote links, and question answering grounded in a
//! relevance-filtered excerpt handed to an external language-model API.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `document`: Document snapshot and rebuild-on-augmentation store
//! - `search`: Keyword context search over document lines
//! - `context`: Relevance-filtered paragraph selection for question grounding
//! - `llm`: Answer-generation client for an OpenAI-compatible API
//! - `ingestion`: Upload and remote-link text acquisition
//! - `api`: REST API endpoints
//! - `config`: Configuration management and settings
//! - `errors`: Centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: Bill text (plain text or PDF), search queries, free-text questions
//! - **Output**: Context windows around keyword hits, natural-language answers
//! - **Determinism**: Search and context selection are pure functions over the
//!   current document snapshot
//!
//! ## Usage
//! ```rust,no_run
//! use bill_context_search::{search::KeywordSearch, config::Config};
//!
//! let config = Config::default();
//! let searcher = KeywordSearch::new(config.search.clone());
//! let windows = searcher.search("alpha\nbeta\ngamma", "beta");
//! println!("Found {} matching sections", windows.len());
//! ```

// Core modules
pub mod api;
pub mod config;
pub mod context;
pub mod document;
pub mod errors;
pub mod ingestion;
pub mod llm;
pub mod search;

// Utilities
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use errors::{BillSearchError, Result};
pub use search::{KeywordSearch, MatchWindow};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Unique identifier for an added text source
pub type SourceId = Uuid;

/// Kind of text source appended to the base document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// The fixed on-disk bill loaded at startup
    Base,
    /// A user-uploaded file (plain text or PDF)
    Upload,
    /// A file fetched from a shareable remote link
    Remote,
}

/// Record of a text source that contributed to the current document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Unique source identifier
    pub id: SourceId,
    /// Display name (file name or URL)
    pub name: String,
    /// Where the text came from
    pub kind: SourceKind,
    /// Characters contributed
    pub chars: usize,
    /// When the source was added
    pub added_at: DateTime<Utc>,
}

/// Application state shared across request handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Config>,
    pub store: Arc<RwLock<document::DocumentStore>>,
    pub searcher: Arc<search::KeywordSearch>,
    pub selector: Arc<context::ContextSelector>,
    pub answerer: Arc<llm::AnswerClient>,
}
