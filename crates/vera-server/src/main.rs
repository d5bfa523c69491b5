use std::sync::Arc;

use tracing::info;
use vera_backends::{HttpBusinessQuery, MySqlListingStore, OpenAiClient, RestrictedWebFetch};
use vera_core::VeraConfig;
use vera_router::{Assistant, AssistantConfig, Collaborators};
use vera_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = VeraConfig::from_env()?;

    let listings = Arc::new(MySqlListingStore::connect(&config.listings_db).await?);
    let openai = Arc::new(OpenAiClient::new(&config.completion));
    let web = Arc::new(RestrictedWebFetch::new(config.listings.domain.clone()));
    let business: Option<Arc<dyn vera_router::traits::BusinessQuery>> = config
        .business
        .as_ref()
        .map(|cfg| Arc::new(HttpBusinessQuery::new(cfg)) as _);

    let assistant = Assistant::new(
        AssistantConfig::from_config(&config),
        Collaborators {
            classifier: openai.clone(),
            completion: openai,
            search: listings.clone(),
            lookup: listings,
            web,
            business,
        },
    );

    let app = vera_server::app(AppState::new(assistant));
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "vera server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
