//! First-level administrative regions recognized as search filters.

use std::sync::LazyLock;

use regex::Regex;

/// The seven provinces, accent-folded and lowercased.
pub const REGIONS: [&str; 7] = [
    "san jose",
    "alajuela",
    "heredia",
    "cartago",
    "guanacaste",
    "puntarenas",
    "limon",
];

static REGION_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    REGIONS
        .iter()
        .map(|region| {
            let pattern = format!(r"\b{}\b", regex::escape(region));
            (Regex::new(&pattern).expect("region pattern"), *region)
        })
        .collect()
});

/// Fold the accented vowels that appear in region names.
pub fn fold_accents(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' | 'à' => 'a',
            'é' | 'è' => 'e',
            'í' | 'ì' => 'i',
            'ó' | 'ò' => 'o',
            'ú' | 'ù' => 'u',
            other => other,
        })
        .collect()
}

/// Whole-word region match, case- and accent-insensitive. First match wins;
/// the result is title-cased for display and filtering.
pub fn detect_region(text: &str) -> Option<String> {
    let folded = fold_accents(&text.to_lowercase());
    REGION_PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(&folded))
        .map(|(_, region)| title_case(region))
}

fn title_case(region: &str) -> String {
    region
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
