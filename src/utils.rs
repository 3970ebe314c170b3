//! # Utilities Module
//!
//! Small text helpers shared across the service.

/// Text utility functions
pub struct TextUtils;

impl TextUtils {
    /// Truncate text for display or logging, appending an ellipsis when cut
    pub fn truncate(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            return text.to_string();
        }
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept.trim_end())
    }

    /// Whether a byte buffer starts with the PDF magic bytes
    pub fn looks_like_pdf(bytes: &[u8]) -> bool {
        bytes.starts_with(b"%PDF")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_truncate() {
        assert_eq!(TextUtils::truncate("Hello world", 20), "Hello world");
        assert_eq!(TextUtils::truncate("This is a very long text", 10), "This is...");
    }

    #[test]
    fn test_looks_like_pdf() {
        assert!(TextUtils::looks_like_pdf(b"%PDF-1.7\n..."));
        assert!(!TextUtils::looks_like_pdf(b"plain text"));
        assert!(!TextUtils::looks_like_pdf(b""));
    }
}
