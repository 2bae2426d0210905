//! Text analysis: raw strings into a canonical token stream.
//!
//! The analyzer is intentionally minimal: no stemming, no stopwords.
//! A token is a maximal run of Unicode letters/numbers, lower-cased,
//! at least two code points long.

use std::collections::HashMap;

/// Minimum token length in code points
const MIN_TOKEN_LEN: usize = 2;

/// Tokenize and normalize text for indexing.
///
/// Tokens are emitted in source order with repetitions preserved, since
/// term frequency matters downstream. Empty input yields no tokens.
pub fn analyze(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();

    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in lowered.chars() {
        if ch.is_alphanumeric() {
            current.push(ch);
        } else if !current.is_empty() {
            flush(&mut tokens, &mut current);
        }
    }
    flush(&mut tokens, &mut current);

    tokens
}

fn flush(tokens: &mut Vec<String>, current: &mut String) {
    if current.chars().count() >= MIN_TOKEN_LEN {
        tokens.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// Count how often each token occurs in a tokenized document.
pub fn term_frequencies(tokens: &[String]) -> HashMap<String, u64> {
    let mut freqs = HashMap::new();
    for token in tokens {
        *freqs.entry(token.clone()).or_insert(0) += 1;
    }
    freqs
}
