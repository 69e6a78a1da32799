//! The text normalization pipeline shared by stream names and generated
//! team/event patterns before fuzzy comparison.
//!
//! Applied in a fixed order since later steps assume earlier ones already
//! ran (clock masking must happen before colon/slash handling, for
//! instance, or `7:30` gets mis-split as a metadata separator).

use regex::Regex;
use std::sync::LazyLock;

/// A handful of common mojibake sequences seen in provider/EPG stream
/// names sourced from improperly decoded Latin-1-as-UTF-8 text.
const MOJIBAKE_REPAIRS: &[(&str, &str)] = &[
    ("Ã©", "é"),
    ("Ã¨", "è"),
    ("Ã¶", "ö"),
    ("Ã¼", "ü"),
    ("Ã±", "ñ"),
    ("Ã§", "ç"),
    ("â€™", "'"),
    ("â€“", "-"),
    ("â€”", "-"),
];

/// Longest-first so multi-word variants match before their substrings do.
const CITY_TEAM_VARIANTS: &[(&str, &str)] = &[
    ("manchester utd", "manchester united"),
    ("man utd", "manchester united"),
    ("man u", "manchester united"),
    ("man city", "manchester city"),
    ("koln", "cologne"),
    ("köln", "cologne"),
    ("munchen", "munich"),
    ("münchen", "munich"),
    ("st louis", "saint louis"),
    ("ny", "new york"),
    ("la", "los angeles"),
];

const SEPARATOR_PUNCTUATION: &[char] = &['_', '-', '.', ':', '/', '|', ','];

static PROVIDER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*\[?[a-z]{2,4}\]?\s*[:\-]\s*").expect("valid regex"));
static TIME_12H: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b\d{1,2}:\d{2}\s*(am|pm)\b").expect("valid regex"));
static TIME_24H: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([01]?\d|2[0-3]):[0-5]\d\b").expect("valid regex"));
static DATE_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,2}[/.-]\d{1,2}([/.-]\d{2,4})?\b").expect("valid regex"));
static DATE_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d{1,2}\s*(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\b")
        .expect("valid regex")
});
static RANKING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\d+").expect("valid regex"));
static CHANNEL_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*ch\.?\s*\d+\s*[:\-]?\s*").expect("valid regex"));
static TRAILING_AT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*[@|]\s*\d[\d:/\-\s]*$").expect("valid regex"));
static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]*)\)").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

const US_STATE_CODES: &[&str] = &[
    "al", "ak", "az", "ar", "ca", "co", "ct", "de", "fl", "ga", "hi", "id", "il", "in", "ia", "ks",
    "ky", "la", "me", "md", "ma", "mi", "mn", "ms", "mo", "mt", "ne", "nv", "nh", "nj", "nm", "ny",
    "nc", "nd", "oh", "ok", "or", "pa", "ri", "sc", "sd", "tn", "tx", "ut", "vt", "va", "wa", "wv",
    "wi", "wy",
];

fn is_us_state_code(content: &str) -> bool {
    US_STATE_CODES.contains(&content.trim().to_lowercase().as_str())
}

fn repair_mojibake(input: &str) -> String {
    let mut text = input.to_string();
    for (broken, fixed) in MOJIBAKE_REPAIRS {
        text = text.replace(broken, fixed);
    }
    text
}

fn mask_clock_times(input: &str) -> String {
    let masked = TIME_12H.replace_all(input, "__TIME__");
    TIME_24H.replace_all(&masked, "__TIME__").into_owned()
}

fn cut_metadata_prefix(input: &str) -> String {
    match input.find(':') {
        Some(idx) if !input[..idx].contains("__TIME__") => input[idx + 1..].to_string(),
        _ => input.to_string(),
    }
}

fn strip_parentheticals_except_state_codes(input: &str) -> String {
    PARENTHETICAL
        .replace_all(input, |caps: &regex::Captures| {
            let content = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            if is_us_state_code(content) {
                caps.get(0).unwrap().as_str().to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

fn apply_city_team_dictionary(input: &str) -> String {
    let mut entries: Vec<&(&str, &str)> = CITY_TEAM_VARIANTS.iter().collect();
    entries.sort_by_key(|(from, _)| std::cmp::Reverse(from.len()));

    let mut text = input.to_string();
    for (from, to) in entries {
        text = text.replace(from, to);
    }
    text
}

/// Runs the full 12-step pipeline and returns the normalized form used
/// for fuzzy comparison on both sides (stream name and generated
/// pattern).
pub fn normalize(input: &str) -> String {
    let mut text = input.to_string();
    text = repair_mojibake(&text);
    text = PROVIDER_PREFIX.replace(&text, "").into_owned();
    text = mask_clock_times(&text);
    text = cut_metadata_prefix(&text);
    text = text.to_lowercase();
    text = text.replace("__time__", "");
    text = DATE_NUMERIC.replace_all(&text, "").into_owned();
    text = DATE_MONTH.replace_all(&text, "").into_owned();
    text = RANKING.replace_all(&text, "").into_owned();
    text = CHANNEL_NUMBER.replace(&text, "").into_owned();
    text = TRAILING_AT_SUFFIX.replace(&text, "").into_owned();
    text = strip_parentheticals_except_state_codes(&text);
    text = text.replace(SEPARATOR_PUNCTUATION, " ");
    text = apply_city_team_dictionary(&text);
    text = WHITESPACE.replace_all(text.trim(), " ").into_owned();
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_collapses_whitespace() {
        assert_eq!(normalize("  Dallas   Cowboys  "), "dallas cowboys");
    }

    #[test]
    fn folds_known_nicknames() {
        assert_eq!(normalize("Man U vs Arsenal"), "manchester united vs arsenal");
    }

    #[test]
    fn strips_provider_prefix_and_metadata_colon() {
        assert_eq!(normalize("US: ESPN: Cowboys at Eagles"), "cowboys at eagles");
    }

    #[test]
    fn keeps_two_letter_state_codes_in_parens() {
        assert_eq!(normalize("Cowboys (TX) at Eagles"), "cowboys (tx) at eagles");
    }

    #[test]
    fn drops_non_state_parentheticals() {
        assert_eq!(normalize("Cowboys (HD) at Eagles"), "cowboys at eagles");
    }

    #[test]
    fn masks_clock_times_before_colon_cut() {
        // The 7:30 must not be treated as the metadata-prefix colon.
        assert_eq!(normalize("Cowboys at Eagles 7:30pm"), "cowboys at eagles");
    }
}
