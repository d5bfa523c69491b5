//! Detail-request detection and ordinal/URL resolution.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};
use vera_core::{Role, Turn};

static DETAIL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // "dime más", "quiero ver detalles", "dame info"
        r"\b(?:dime|dame|quiero|necesito|muestra|mostrame|muéstrame|ver)\s+(?:más|mas|info|información|informacion|detalles?)\b",
        // "sobre la", "de esa", "del este"
        r"\b(?:sobre|de|del)\s+(?:la|el|esa|ese|esta|este)\b",
        r"\b(?:ampliar|expandir|profundiza|profundizar)\b",
        // ordinal words and bare small integers ("cuarto" alone is skipped
        // here: as a noun it means a room, not a rank)
        r"\b(?:primer[ao]?|segund[ao]?|tercer[ao]?|[0-9]{1,2}[aº°]?)\b",
        r"#[0-9]+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("detail pattern"))
    .collect()
});

static HASH_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([0-9]+)").expect("hash ref pattern"));

static ARTICLE_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:la|el|número|numero|num)\s+([0-9]+)\b").expect("article ref pattern")
});

/// Spelled-out ordinals, stem-matched so gendered forms all resolve.
const ORDINALS: [(&str, usize); 6] = [
    ("primer", 1),
    ("segund", 2),
    ("tercer", 3),
    ("cuart", 4),
    ("quint", 5),
    ("sext", 6),
];

/// Does the message ask for more detail about something already shown?
pub fn is_detail_request(message: &str) -> bool {
    let lowered = message.to_lowercase();
    DETAIL_PATTERNS.iter().any(|re| re.is_match(&lowered))
}

/// Listing URLs embedded in assistant turns, most recent first, deduplicated
/// preserving recency order. User-authored URLs are deliberately ignored.
pub fn extract_listing_urls(window: &[Turn], url_re: &Regex) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();
    for turn in window.iter().rev() {
        if turn.role != Role::Assistant {
            continue;
        }
        for found in url_re.find_iter(&turn.text) {
            let url = found.as_str().to_string();
            if seen.insert(url.clone()) {
                urls.push(url);
            }
        }
    }
    urls
}

/// 1-indexed reference number, if the message carries one.
/// `#N` wins, then spelled ordinals, then "la/el/número N".
pub fn reference_index(message: &str) -> Option<usize> {
    let lowered = message.to_lowercase();

    if let Some(captures) = HASH_REF_RE.captures(&lowered) {
        let n = captures[1].parse().ok()?;
        debug!(n, "numbered reference (#N)");
        return Some(n);
    }

    for (stem, n) in ORDINALS {
        if lowered.contains(stem) {
            debug!(stem, n, "ordinal reference");
            return Some(n);
        }
    }

    if let Some(captures) = ARTICLE_REF_RE.captures(&lowered) {
        let n = captures[1].parse().ok()?;
        debug!(n, "numeric reference (la/el N)");
        return Some(n);
    }

    None
}

/// Pick the URL for a reference: explicit numbers are 1-indexed, no number
/// means the most recent. An out-of-range number yields `None` (no rewrite).
pub fn select_url<'a>(urls: &'a [String], reference: Option<usize>) -> Option<&'a str> {
    if urls.is_empty() {
        return None;
    }
    match reference {
        Some(n) => {
            let index = n.checked_sub(1)?;
            match urls.get(index) {
                Some(url) => Some(url.as_str()),
                None => {
                    warn!(n, available = urls.len(), "listing reference out of range");
                    None
                }
            }
        }
        None => Some(urls[0].as_str()),
    }
}

/// The self-contained instruction a resolved reference becomes.
pub fn detail_instruction(url: &str) -> String {
    format!("Dame información detallada de {url}")
}
