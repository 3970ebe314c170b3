//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the bill search service, providing structured
//! error types for every failure boundary in the system.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from document loading, source acquisition,
//!   answer generation, and the API layer
//! - **Output**: Structured error types with context, suitable for logging and
//!   for user-visible error payloads
//! - **Error Categories**: Document, Acquisition, AnswerGeneration, Config, Api
//!
//! ## Key Features
//! - Struct-variant errors with detailed context
//! - Automatic conversion from common library error types
//! - Category tagging for structured logging
//! - Nothing here is fatal: every failure is designed to be surfaced to the
//!   user once while the session continues

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, BillSearchError>;

/// Error types for the bill search service
#[derive(Debug, Error)]
pub enum BillSearchError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors for configuration fields
    #[error("Validation failed for field '{field}': {reason}")]
    ValidationFailed { field: String, reason: String },

    /// Base document could not be read at startup
    #[error("Failed to load base document from {path}: {details}")]
    DocumentLoadFailed { path: String, details: String },

    // Source acquisition errors
    #[error("Failed to extract text from uploaded file '{filename}': {details}")]
    UploadExtractionFailed { filename: String, details: String },

    #[error("Unsupported file type for '{filename}': {details}")]
    UnsupportedFileType { filename: String, details: String },

    #[error("Could not extract a file identifier from link: {url}")]
    InvalidShareLink { url: String },

    #[error("Remote download failed for {url}: {details}")]
    RemoteDownloadFailed { url: String, details: String },

    // Answer generation errors
    #[error("Answer generation request failed: {details}")]
    AnswerGenerationFailed { details: String },

    #[error("Answer service returned an unexpected response: {details}")]
    AnswerResponseMalformed { details: String },

    // API errors
    #[error("Invalid API request: {details}")]
    InvalidApiRequest { details: String },

    /// Network-related errors
    #[error("Network error: {details}")]
    NetworkError { details: String },

    /// Internal system errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl BillSearchError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            BillSearchError::Config { .. } | BillSearchError::ValidationFailed { .. } => {
                "configuration"
            }
            BillSearchError::DocumentLoadFailed { .. } => "document",
            BillSearchError::UploadExtractionFailed { .. }
            | BillSearchError::UnsupportedFileType { .. }
            | BillSearchError::InvalidShareLink { .. }
            | BillSearchError::RemoteDownloadFailed { .. } => "acquisition",
            BillSearchError::AnswerGenerationFailed { .. }
            | BillSearchError::AnswerResponseMalformed { .. } => "answer_generation",
            BillSearchError::InvalidApiRequest { .. } => "api",
            BillSearchError::NetworkError { .. } => "network",
            BillSearchError::Internal { .. } => "generic",
        }
    }

    /// Whether the user can reasonably retry the same action by hand.
    /// No automatic retries happen anywhere; this only informs messaging.
    pub fn is_user_retryable(&self) -> bool {
        matches!(
            self,
            BillSearchError::NetworkError { .. }
                | BillSearchError::RemoteDownloadFailed { .. }
                | BillSearchError::AnswerGenerationFailed { .. }
        )
    }
}

// Conversion from common error types
impl From<std::io::Error> for BillSearchError {
    fn from(err: std::io::Error) -> Self {
        BillSearchError::Internal {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<reqwest::Error> for BillSearchError {
    fn from(err: reqwest::Error) -> Self {
        BillSearchError::NetworkError {
            details: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BillSearchError {
    fn from(err: serde_json::Error) -> Self {
        BillSearchError::Internal {
            message: format!("JSON serialization error: {}", err),
        }
    }
}

impl From<toml::de::Error> for BillSearchError {
    fn from(err: toml::de::Error) -> Self {
        BillSearchError::Config {
            message: format!("TOML parse error: {}", err),
        }
    }
}
