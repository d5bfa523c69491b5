use crate::error::{Result, VeraError};
use serde::{Deserialize, Serialize};
use std::env;

/// Top-level configuration, resolved once at startup.
///
/// Every backend connection string is enumerated here explicitly; a missing
/// listings database is fatal before the first request is served.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VeraConfig {
    pub server: ServerConfig,
    pub completion: CompletionConfig,
    pub listings_db: DatabaseConfig,
    pub business: Option<BusinessConfig>,
    pub listings: ListingsConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }
}

/// External NL-to-structured-query service for the business database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessConfig {
    pub endpoint: String,
}

/// The public listings site the assistant is allowed to reference and fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingsConfig {
    pub domain: String,
    pub base_url: String,
}

impl Default for ListingsConfig {
    fn default() -> Self {
        Self {
            domain: "bienesadjudicadoscr.com".into(),
            base_url: "https://bienesadjudicadoscr.com/propiedades/".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle seconds before a session's state is swept away.
    pub ttl_secs: u64,
    /// Token budget for the per-session transcript.
    pub memory_token_budget: usize,
    /// How many recent turns the resolver/router may see.
    pub memory_window: usize,
    /// Row cap handed to the structured search backend.
    pub search_limit: u32,
    /// Upper bound on a single provider execution.
    pub provider_timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 60 * 30,
            memory_token_budget: 4000,
            memory_window: 10,
            search_limit: 20,
            provider_timeout_secs: 60,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 8000 }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn var_or(key: &str, default: &str) -> String {
    var(key).unwrap_or_else(|| default.to_string())
}

fn var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    var(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

impl VeraConfig {
    /// Read the full configuration from the environment, failing fast when
    /// the listings database settings are incomplete.
    pub fn from_env() -> Result<Self> {
        let listings_db = DatabaseConfig {
            host: var("LISTINGS_DB_HOST").unwrap_or_default(),
            port: var_parse("LISTINGS_DB_PORT", 3306),
            database: var("LISTINGS_DB_NAME").unwrap_or_default(),
            username: var("LISTINGS_DB_USER").unwrap_or_default(),
            password: var("LISTINGS_DB_PASSWORD").unwrap_or_default(),
        };

        let mut missing = Vec::new();
        if listings_db.host.is_empty() {
            missing.push("LISTINGS_DB_HOST");
        }
        if listings_db.database.is_empty() {
            missing.push("LISTINGS_DB_NAME");
        }
        if listings_db.username.is_empty() {
            missing.push("LISTINGS_DB_USER");
        }
        if !missing.is_empty() {
            return Err(VeraError::Configuration(format!(
                "listings database requires {}",
                missing.join(", ")
            )));
        }

        let api_key = var("OPENAI_API_KEY")
            .ok_or_else(|| VeraError::Configuration("OPENAI_API_KEY is required".into()))?;

        let listings_defaults = ListingsConfig::default();
        let domain = var_or("LISTINGS_DOMAIN", &listings_defaults.domain);
        let base_url = var("LISTINGS_BASE_URL")
            .unwrap_or_else(|| format!("https://{domain}/propiedades/"));

        Ok(Self {
            server: ServerConfig {
                host: var_or("SERVER_HOST", "0.0.0.0"),
                port: var_parse("SERVER_PORT", 8000),
            },
            completion: CompletionConfig {
                api_key,
                model: var_or("OPENAI_MODEL", "gpt-4.1"),
                max_tokens: var_parse("OPENAI_MAX_TOKENS", 2000),
                base_url: var_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            },
            listings_db,
            business: var("BUSINESS_QUERY_URL").map(|endpoint| BusinessConfig { endpoint }),
            listings: ListingsConfig { domain, base_url },
            session: SessionConfig {
                ttl_secs: var_parse("SESSION_TTL_SECS", 60 * 30),
                memory_token_budget: var_parse("MEMORY_TOKEN_BUDGET", 4000),
                memory_window: var_parse("MEMORY_WINDOW", 10),
                search_limit: var_parse("SEARCH_LIMIT", 20),
                provider_timeout_secs: var_parse("PROVIDER_TIMEOUT_SECS", 60),
            },
        })
    }
}
