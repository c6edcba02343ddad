use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::Numeric;

// Scheme, then letters/digits, a small symbol set, or %XX escapes. The class
// includes ',' '(' ')', so punctuation glued to a URL is captured with it.
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(?:[A-Za-z0-9$\-_@.&+!*(),]|%[0-9a-fA-F]{2})+")
        .expect("hardcoded URL regex is valid")
});

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+\.?\d*").expect("hardcoded number regex is valid"));

/// Distinct URL substrings in one page's text, first occurrence first.
pub(crate) fn find_urls(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();
    for found in URL_RE.find_iter(text) {
        let url = found.as_str();
        if seen.insert(url) {
            urls.push(url.to_string());
        }
    }
    urls
}

/// Numeric tokens in one page's text, left to right, duplicates kept.
pub(crate) fn find_numbers(text: &str) -> Vec<Numeric> {
    NUMBER_RE
        .find_iter(text)
        .map(|found| found.as_str())
        .filter(|token| !token.is_empty())
        .map(parse_numeric)
        .collect()
}

fn parse_numeric(token: &str) -> Numeric {
    if !token.contains('.')
        && let Ok(value) = token.parse::<i64>()
    {
        return Numeric::Int(value);
    }
    Numeric::Real(token.parse().unwrap_or(0.0))
}
