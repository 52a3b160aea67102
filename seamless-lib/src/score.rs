//! Deterministic fuzzy scorer.
//!
//! Heuristics in precedence order; a higher rule short-circuits the lower
//! ones:
//!
//! 1. exact match → 1.0
//! 2. prefix → 0.9
//! 3. substring → 0.7 plus a position bonus below 0.1
//! 4. multi-word coverage → up to 0.8
//! 5. bigram overlap (only while below 0.5) → up to 0.6
//! 6. Levenshtein similarity (only while below 0.5, queries over two
//!    characters) → similarity × 0.5 when similarity > 0.5

use std::collections::HashSet;

use strsim::normalized_levenshtein;

use crate::index::{IndexedItem, char_ngrams, normalize};

/// A query prepared once per filter pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub normalized: String,
    pub words: Vec<String>,
    pub bigrams: HashSet<String>,
}

impl Query {
    pub fn new(raw: &str) -> Self {
        let normalized = normalize(raw);
        Self {
            words: normalized.split_whitespace().map(str::to_string).collect(),
            bigrams: char_ngrams(&normalized, 2),
            normalized,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

/// Scores `item` against `query`, in `[0, 1]`.
///
/// An empty query matches everything with 1.0.
pub fn score(query: &Query, item: &IndexedItem) -> f64 {
    let needle = query.normalized.as_str();
    let text = item.normalized_text.as_str();

    if needle.is_empty() {
        return 1.0;
    }
    if text.is_empty() {
        return 0.0;
    }
    if text == needle {
        return 1.0;
    }
    if text.starts_with(needle) {
        return 0.9;
    }
    if let Some(position) = text.find(needle) {
        let bonus = 0.1 * (1.0 - position as f64 / text.len() as f64);
        return 0.7 + bonus.min(0.099);
    }

    let mut best = 0.0_f64;

    if query.words.len() > 1 {
        let covered = query
            .words
            .iter()
            .filter(|word| {
                item.search_tokens
                    .tokens
                    .iter()
                    .any(|token| token.contains(word.as_str()))
            })
            .count();
        best = best.max(covered as f64 / query.words.len() as f64 * 0.8);
    }

    if best < 0.5 {
        let ngrams = &item.search_tokens.ngrams;
        let denominator = query.bigrams.len().max(ngrams.len());
        if denominator > 0 {
            let shared = query.bigrams.intersection(ngrams).count();
            best = best.max(shared as f64 / denominator as f64 * 0.6);
        }
    }

    if best < 0.5 && needle.chars().count() > 2 {
        let similarity = normalized_levenshtein(text, needle);
        if similarity > 0.5 {
            best = best.max(similarity * 0.5);
        }
    }

    best.clamp(0.0, 1.0)
}

/// `true` when `score` clears `threshold`.
pub fn is_match(score: f64, threshold: f64) -> bool {
    score > threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagedom::Document;

    fn item(label: &str) -> IndexedItem {
        IndexedItem::new(Document::new().root(), label)
    }

    fn score_of(query: &str, label: &str) -> f64 {
        score(&Query::new(query), &item(label))
    }

    #[test]
    fn test_precedence_values() {
        assert_eq!(score_of("Nablus", "nablus"), 1.0);
        assert_eq!(score_of("nabl", "Nablus"), 0.9);
        let substring = score_of("blus", "Nablus");
        assert!(substring > 0.7 && substring < 0.8, "{substring}");
    }

    #[test]
    fn test_earlier_substring_scores_higher() {
        assert!(score_of("old", "Bold Old Town") > score_of("town", "Bold Old Town"));
    }

    #[test]
    fn test_monotonicity() {
        let label = "Ramallah";
        let exact = score_of(label, label);
        let prefix = score_of("rama", label);
        for substring in ["ama", "mall", "llah", "ah"] {
            let s = score_of(substring, label);
            assert!(exact == 1.0 && exact > prefix && prefix >= s, "{substring}: {s}");
        }
    }

    #[test]
    fn test_multi_word_coverage() {
        // "city old" is not a substring of "old city", but both words are covered.
        assert_eq!(score_of("city old", "Old City"), 0.8);
        // Half of the words covered.
        let half = score_of("city zzz", "Old City");
        assert!(half >= 0.4 && half < 0.8, "{half}");
    }

    #[test]
    fn test_single_word_skips_coverage_rule() {
        assert!(score_of("xyz123", "Nablus") < 0.3);
        assert!(score_of("xyz123", "Ramallah") < 0.3);
        assert!(score_of("xyz123", "Hebron") < 0.3);
    }

    #[test]
    fn test_typo_falls_back_to_edit_distance() {
        let s = score_of("nablos", "Nablus");
        assert!(s > 0.3 && s <= 0.5, "{s}");
    }

    #[test]
    fn test_empty_cases() {
        assert_eq!(score_of("", "Nablus"), 1.0);
        assert_eq!(score_of("nab", ""), 0.0);
        assert!(is_match(0.31, 0.3));
        assert!(!is_match(0.3, 0.3));
    }
}
