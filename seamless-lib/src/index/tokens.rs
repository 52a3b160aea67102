use std::collections::HashSet;

/// Lower-cases and trims a label or query.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Collapses whitespace runs to single spaces and trims.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Precomputed search material for one label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchTokens {
    /// Whitespace-split lower-cased words, in order.
    pub tokens: Vec<String>,
    /// Lower-cased substrings of length 2 and 3.
    pub ngrams: HashSet<String>,
}

impl SearchTokens {
    pub fn from_label(label: &str) -> Self {
        let normalized = normalize(label);
        let mut ngrams = char_ngrams(&normalized, 2);
        ngrams.extend(char_ngrams(&normalized, 3));
        Self {
            tokens: normalized.split_whitespace().map(str::to_string).collect(),
            ngrams,
        }
    }
}

/// Distinct character n-grams of `text`.
pub fn char_ngrams(text: &str, n: usize) -> HashSet<String> {
    let chars: Vec<char> = text.chars().collect();
    if n == 0 || chars.len() < n {
        return HashSet::new();
    }
    chars.windows(n).map(|window| window.iter().collect()).collect()
}
