//! # Semantic Context Selector Module
//!
//! ## Purpose
//! Selects the paragraphs of the document most relevant to a free-text
//! question, bounded in count and total size, for use as grounding context in
//! an answer-generation prompt.
//!
//! ## Input/Output Specification
//! - **Input**: Document text, free-text question
//! - **Output**: Bounded concatenation of relevant paragraphs (possibly empty)
//! - **Determinism**: Pure function over its inputs; no I/O, no randomness
//!
//! ## Key Features
//! - Paragraph segmentation on blank-line separators
//! - A paragraph is relevant iff any question word appears as a substring of
//!   its lowercased text; this is deliberately not word-boundary aware, so a
//!   question word like "can" also matches "cancel"
//! - Relevant paragraphs kept in original document order, no scoring or
//!   frequency weighting
//! - Capped at a configured paragraph count, then hard-truncated to a
//!   configured character budget

use crate::config::ContextConfig;

/// Separator used when joining selected paragraphs
const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Relevance-filtered paragraph selector
pub struct ContextSelector {
    config: ContextConfig,
}

impl ContextSelector {
    /// Create a selector with the given configuration
    pub fn new(config: ContextConfig) -> Self {
        Self { config }
    }

    /// Select grounding context for a question
    ///
    /// Returns an empty string when no paragraph contains any question word;
    /// the caller decides how to handle grounding a downstream answer with
    /// empty context.
    pub fn select(&self, document: &str, question: &str) -> String {
        let words: Vec<String> = question
            .to_lowercase()
            .split_whitespace()
            .map(|w| w.to_string())
            .collect();

        if words.is_empty() {
            return String::new();
        }

        let relevant: Vec<&str> = document
            .split("\n\n")
            .filter(|paragraph| {
                let lowered = paragraph.to_lowercase();
                words.iter().any(|w| lowered.contains(w.as_str()))
            })
            .take(self.config.max_paragraphs)
            .collect();

        let joined = relevant.join(PARAGRAPH_SEPARATOR);
        let selected = truncate_chars(&joined, self.config.max_chars);

        tracing::debug!(
            question_words = words.len(),
            paragraphs = relevant.len(),
            chars = selected.chars().count(),
            "Context selected"
        );

        selected
    }
}

/// Hard-truncate a string to at most `max_chars` characters
///
/// Character-based rather than byte-based so the cut never splits a UTF-8
/// code point. Not word-boundary aware.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> ContextSelector {
        ContextSelector::new(ContextConfig {
            max_paragraphs: 5,
            max_chars: 3000,
        })
    }

    #[test]
    fn test_single_relevant_paragraph_selected() {
        let doc = "Union members may bargain.\n\nFunding is allocated separately.";
        let out = selector().select(doc, "does the bill mention union bargaining");
        assert_eq!(out, "Union members may bargain.");
    }

    #[test]
    fn test_no_overlap_yields_empty() {
        let out = selector().select("no relevant text here", "NATCA");
        assert_eq!(out, "");
    }

    #[test]
    fn test_empty_question_yields_empty() {
        let out = selector().select("some text", "   ");
        assert_eq!(out, "");
    }

    #[test]
    fn test_paragraphs_kept_in_document_order() {
        let doc = "third topic funding\n\nfirst topic union\n\nsecond topic union funding";
        let out = selector().select(doc, "union funding");
        let parts: Vec<&str> = out.split("\n\n").collect();
        assert_eq!(
            parts,
            vec![
                "third topic funding",
                "first topic union",
                "second topic union funding"
            ]
        );
    }

    #[test]
    fn test_at_most_five_paragraphs() {
        let doc = (0..10)
            .map(|i| format!("paragraph {} about union matters", i))
            .collect::<Vec<_>>()
            .join("\n\n");
        let out = selector().select(&doc, "union");
        assert_eq!(out.split("\n\n").count(), 5);
        assert!(out.starts_with("paragraph 0"));
    }

    #[test]
    fn test_output_capped_at_char_budget() {
        let long_paragraph = "union ".repeat(1000);
        let out = selector().select(&long_paragraph, "union");
        assert!(out.chars().count() <= 3000);
    }

    #[test]
    fn test_truncation_is_a_hard_cut() {
        let s = ContextSelector::new(ContextConfig {
            max_paragraphs: 5,
            max_chars: 10,
        });
        let out = s.select("union bargaining rights", "union");
        assert_eq!(out, "union barg");
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // Multibyte text must not be split mid code point.
        let out = truncate_chars("héllo wörld", 7);
        assert_eq!(out, "héllo w");
    }

    #[test]
    fn test_substring_matching_is_not_word_boundary() {
        // "can" matching "cancel" is the specified behavior.
        let doc = "the agency may cancel the program";
        let out = selector().select(doc, "can");
        assert_eq!(out, doc);
    }

    #[test]
    fn test_case_insensitive_relevance() {
        let doc = "NATCA shall be the exclusive representative.";
        let out = selector().select(doc, "what does natca do");
        assert_eq!(out, doc);
    }

    #[test]
    fn test_purity() {
        let doc = "Union members may bargain.\n\nFunding is allocated separately.";
        let s = selector();
        assert_eq!(s.select(doc, "union"), s.select(doc, "union"));
    }

    #[test]
    fn test_empty_document() {
        // An empty document has one empty paragraph, which never contains a
        // non-empty question word.
        let out = selector().select("", "union");
        assert_eq!(out, "");
    }
}
