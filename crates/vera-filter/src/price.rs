//! Price-ceiling detection: "hasta 200 mil", "bajo 150000", "máximo 1.5 millones".

use std::sync::LazyLock;

use regex::Regex;

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:precio|hasta|m[aá]ximo|menos\s+de|bajo|por\s+debajo\s+de)\s*:?\s*(\d{1,3}(?:[.,]\d{3})*|\d+)\s*(k|millones|mill[oó]n|mil)?\b",
    )
    .expect("price pattern")
});

/// Parse an integer upper bound from free text, applying magnitude suffixes
/// (`k`/`mil` ×1 000, `millón`/`millones` ×1 000 000). Thousand separators
/// in the digits are accepted and stripped.
pub fn detect_price_ceiling(text: &str) -> Option<i64> {
    let lowered = text.to_lowercase();
    let captures = PRICE_RE.captures(&lowered)?;

    let raw: String = captures[1].chars().filter(|c| c.is_ascii_digit()).collect();
    let base: i64 = raw.parse().ok()?;

    let multiplier = match captures.get(2).map(|m| m.as_str()) {
        Some("k") | Some("mil") => 1_000,
        Some("millon") | Some("millón") | Some("millones") => 1_000_000,
        _ => 1,
    };

    Some(base * multiplier)
}
