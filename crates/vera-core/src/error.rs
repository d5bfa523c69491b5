use thiserror::Error;

#[derive(Error, Debug)]
pub enum VeraError {
    #[error("configuration incomplete: {0}")]
    Configuration(String),
    #[error("no capability provider selected: {0}")]
    Routing(String),
    #[error("provider '{provider}' failed: {source}")]
    Provider {
        provider: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, VeraError>;
