use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use vera_core::Listing;
use vera_filter::SearchRequest;
use vera_router::traits::{Classifier, Completion, ListingLookup, ListingSearch, WebFetch};
use vera_router::{Assistant, AssistantConfig, Collaborators, ProviderCard};

use crate::state::AppState;

struct GeneralClassifier;

#[async_trait]
impl Classifier for GeneralClassifier {
    async fn select(&self, _message: &str, _choices: &[ProviderCard]) -> anyhow::Result<String> {
        Ok("conversacion_general".into())
    }
}

struct FixedCompletion;

#[async_trait]
impl Completion for FixedCompletion {
    async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
        Ok("Con gusto te ayudo.".into())
    }
}

struct EmptySearch;

#[async_trait]
impl ListingSearch for EmptySearch {
    async fn execute(&self, _request: &SearchRequest) -> anyhow::Result<Vec<Listing>> {
        Ok(Vec::new())
    }
}

struct EmptyLookup;

#[async_trait]
impl ListingLookup for EmptyLookup {
    async fn by_url(&self, _url: &str) -> anyhow::Result<Option<Listing>> {
        Ok(None)
    }
    async fn by_name(&self, _name: &str) -> anyhow::Result<Option<Listing>> {
        Ok(None)
    }
}

struct EmptyWeb;

#[async_trait]
impl WebFetch for EmptyWeb {
    async fn retrieve(&self, _url: &str) -> anyhow::Result<String> {
        Ok(String::new())
    }
}

fn test_app() -> axum::Router {
    let assistant = Assistant::new(
        AssistantConfig::default(),
        Collaborators {
            classifier: Arc::new(GeneralClassifier),
            completion: Arc::new(FixedCompletion),
            search: Arc::new(EmptySearch),
            lookup: Arc::new(EmptyLookup),
            web: Arc::new(EmptyWeb),
            business: None,
        },
    );
    crate::app(AppState::new(assistant))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = test_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_chat_round_trip() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(CONTENT_TYPE, "application/json")
        .header("x-session-id", "sesion-9")
        .body(Body::from(r#"{"mensaje": "hola", "nombre": "Ana"}"#))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["respuesta"], "Con gusto te ayudo.");
    assert_eq!(body["id"], "sesion-9");
}

#[tokio::test]
async fn test_chat_defaults_session() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"mensaje": "hola"}"#))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["id"], "dev");
}

#[tokio::test]
async fn test_chat_rejects_empty_message() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"mensaje": "   "}"#))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn test_saludo_personalized() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/saludo?nombre=Ana")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    let saludo = body["saludo"].as_str().unwrap();
    assert!(saludo.contains("Ana"));
    assert!(saludo.contains("VERA"));
}

#[tokio::test]
async fn test_delete_memory_reports_existence() {
    let app = test_app();

    // Create the session with one chat turn.
    let chat = Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(CONTENT_TYPE, "application/json")
        .header("x-session-id", "borrame")
        .body(Body::from(r#"{"mensaje": "hola"}"#))
        .unwrap();
    app.clone().oneshot(chat).await.unwrap();

    let delete = Request::builder()
        .method("POST")
        .uri("/api/eliminarMemoria")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"id": "borrame"}"#))
        .unwrap();
    let response = app.clone().oneshot(delete).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["existed"], true);

    // Deleting again finds nothing.
    let delete = Request::builder()
        .method("POST")
        .uri("/api/eliminarMemoria")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"id": "borrame"}"#))
        .unwrap();
    let body = body_json(app.oneshot(delete).await.unwrap()).await;
    assert_eq!(body["existed"], false);
}
