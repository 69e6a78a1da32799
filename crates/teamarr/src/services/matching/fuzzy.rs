//! Weighted fuzzy scoring over three `rapidfuzz` metrics, exposing the
//! single `matches_any` entry point every matcher stage calls.

use rapidfuzz::fuzz;

const RATIO_WEIGHT: f64 = 0.4;
const TOKEN_SET_RATIO_WEIGHT: f64 = 0.4;
const PARTIAL_RATIO_WEIGHT: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Ratio,
    TokenSetRatio,
    PartialRatio,
    Weighted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch<'a> {
    pub pattern: &'a str,
    pub score: f64,
    pub algorithm: Algorithm,
}

/// The combined weighted score (0-100) between two already-normalized
/// strings.
pub fn weighted_score(pattern: &str, haystack: &str) -> f64 {
    let ratio = fuzz::ratio(pattern.chars(), haystack.chars());
    let token_set = fuzz::token_set_ratio(pattern.chars(), haystack.chars());
    let partial = fuzz::partial_ratio(pattern.chars(), haystack.chars());

    ratio * RATIO_WEIGHT + token_set * TOKEN_SET_RATIO_WEIGHT + partial * PARTIAL_RATIO_WEIGHT
}

/// Returns the best-scoring pattern that clears `threshold`, or `None`
/// if no pattern does. Patterns and haystack are expected to already be
/// normalized ([`super::normalize::normalize`]).
pub fn matches_any<'a>(patterns: &[&'a str], haystack: &str, threshold: u8) -> Option<FuzzyMatch<'a>> {
    patterns
        .iter()
        .map(|pattern| FuzzyMatch {
            pattern,
            score: weighted_score(pattern, haystack),
            algorithm: Algorithm::Weighted,
        })
        .filter(|m| m.score >= threshold as f64)
        .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_scores_one_hundred() {
        let score = weighted_score("dallas cowboys", "dallas cowboys");
        assert!((score - 100.0).abs() < 0.001);
    }

    #[test]
    fn matches_any_picks_the_highest_scoring_pattern_above_threshold() {
        let patterns = vec!["new york giants", "dallas cowboys"];
        let result = matches_any(&patterns, "dallas cowboys", 75);
        assert_eq!(result.unwrap().pattern, "dallas cowboys");
    }

    #[test]
    fn matches_any_returns_none_below_threshold() {
        let patterns = vec!["new york giants"];
        let result = matches_any(&patterns, "completely unrelated text", 75);
        assert!(result.is_none());
    }
}
