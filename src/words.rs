//! Database identifier word-splitting, used by the keyword scorer
//! (spec.md §4.6) to turn `customer_id` / `customerId` / `CustomerID` into
//! comparable lowercase word lists.

use regex::Regex;
use std::sync::OnceLock;

fn camel_case_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[A-Z]+(?![a-z])|[A-Z][a-z]*|[a-z]+").unwrap())
}

/// Split a database identifier into lowercase words:
/// - if it contains an underscore, split on underscores;
/// - else if it looks like camelCase/PascalCase, split on case boundaries;
/// - else treat the whole identifier as a single word.
pub fn identifier_to_lc_words(name: &str) -> Vec<String> {
    if name.contains('_') {
        return name
            .split('_')
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
            .collect();
    }

    let matches: Vec<String> = camel_case_pattern()
        .find_iter(name)
        .map(|m| m.as_str().to_lowercase())
        .collect();

    if matches.is_empty() {
        vec![name.to_lowercase()]
    } else {
        matches
    }
}
