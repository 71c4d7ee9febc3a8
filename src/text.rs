//! Text normalization and word-set tokenization.
//!
//! These are the leaf primitives of the matching pipeline. Both are pure,
//! total functions: any string input (empty, non-ASCII, adversarial) produces
//! a result, never an error.
//!
//! `normalize` canonicalizes case and whitespace so that the sequence-ratio
//! comparison in [`crate::matcher`] sees spelling, not formatting.
//! `tokenize` reduces a question to its word set so that paraphrases with
//! shared vocabulary score highly regardless of word order.

use std::collections::HashSet;

/// Lowercase, trim, and collapse all internal whitespace runs to one space.
///
/// Whitespace is Unicode whitespace; lowercasing is Unicode-aware. The empty
/// string maps to the empty string.
///
/// # Example
///
/// ```rust
/// use faq_agent::text::normalize;
///
/// assert_eq!(normalize("  What   does\tEVA do?  "), "what does eva do?");
/// ```
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract the set of word tokens from a string.
///
/// The input is normalized first, then every maximal run of ASCII letters,
/// digits, and apostrophes becomes a token. Punctuation and symbols are
/// separators and are discarded, as are non-ASCII letters (they simply never
/// start or extend a token). Duplicates collapse into the set.
pub fn tokenize(text: &str) -> HashSet<String> {
    let normalized = normalize(text);
    let mut tokens = HashSet::new();
    let mut current = String::new();

    for ch in normalized.chars() {
        if ch.is_ascii_alphanumeric() || ch == '\'' {
            current.push(ch);
        } else if !current.is_empty() {
            tokens.insert(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.insert(current);
    }

    tokens
}
