//! Page-content retrieval restricted to the allow-listed listings domain.

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::info;
use vera_core::domain::host_allowed;
use vera_router::traits::WebFetch;

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>").expect("script pattern")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern"));

/// Collapse an HTML page into whitespace-normalized text.
fn page_to_text(html: &str) -> String {
    let without_scripts = SCRIPT_RE.replace_all(html, " ");
    let without_tags = TAG_RE.replace_all(&without_scripts, " ");
    without_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub struct RestrictedWebFetch {
    http: reqwest::Client,
    allowed_domain: String,
}

impl RestrictedWebFetch {
    pub fn new(allowed_domain: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            allowed_domain: allowed_domain.into(),
        }
    }
}

#[async_trait]
impl WebFetch for RestrictedWebFetch {
    async fn retrieve(&self, url: &str) -> anyhow::Result<String> {
        if !host_allowed(url, &self.allowed_domain) {
            anyhow::bail!("url outside the allowed domain '{}'", self.allowed_domain);
        }
        let html = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let text = page_to_text(&html);
        info!(url, chars = text.len(), "page retrieved");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_to_text_strips_markup() {
        let html = "<html><head><script>var x = 1;</script><style>p{}</style></head>\
                    <body><h1>Casa en El Carmen</h1><p>Tres   habitaciones.</p></body></html>";
        assert_eq!(page_to_text(html), "Casa en El Carmen Tres habitaciones.");
    }

    #[tokio::test]
    async fn test_retrieve_rejects_foreign_domain() {
        let fetcher = RestrictedWebFetch::new("bienesadjudicadoscr.com");
        let err = fetcher
            .retrieve("https://evil.example.com/propiedades/x")
            .await
            .expect_err("must reject");
        assert!(err.to_string().contains("allowed domain"));
    }
}
