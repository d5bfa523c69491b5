//! Client for the external business-database query service.
//!
//! The service owns the NL-to-structured-query translation; this side only
//! ships the question and relays the answer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use vera_core::config::BusinessConfig;
use vera_router::traits::BusinessQuery;

#[derive(Serialize)]
struct BusinessRequest<'a> {
    question: &'a str,
}

#[derive(Deserialize)]
struct BusinessResponse {
    answer: String,
}

pub struct HttpBusinessQuery {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpBusinessQuery {
    pub fn new(config: &BusinessConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(45))
                .build()
                .unwrap_or_default(),
            endpoint: config.endpoint.clone(),
        }
    }
}

#[async_trait]
impl BusinessQuery for HttpBusinessQuery {
    async fn answer(&self, question: &str) -> anyhow::Result<String> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&BusinessRequest { question })
            .send()
            .await?
            .error_for_status()?
            .json::<BusinessResponse>()
            .await?;
        Ok(response.answer)
    }
}
