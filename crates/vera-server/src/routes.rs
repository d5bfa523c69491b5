use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

/// Session key taken from the `x-session-id` header; the transport wrapper
/// in front of this service fills it from the authenticated identity.
const SESSION_HEADER: &str = "x-session-id";
const DEV_SESSION: &str = "dev";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub mensaje: String,
    pub nombre: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub respuesta: String,
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct SaludoParams {
    pub nombre: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub id: Option<String>,
}

fn session_id(headers: &HeaderMap) -> String {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(DEV_SESSION)
        .to_string()
}

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/saludo", get(saludo))
        .route("/api/eliminarMemoria", post(delete_memory))
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let mensaje = request.mensaje.trim();
    if mensaje.is_empty() {
        return Err(ApiError::bad_request("mensaje vacío"));
    }
    let id = session_id(&headers);
    let respuesta = state
        .assistant
        .handle_turn(&id, mensaje, request.nombre.as_deref())
        .await;
    Ok(Json(ChatResponse { respuesta, id }))
}

async fn saludo(
    State(state): State<AppState>,
    Query(params): Query<SaludoParams>,
) -> Json<Value> {
    Json(json!({ "saludo": state.assistant.greeting(params.nombre.as_deref()) }))
}

async fn delete_memory(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<DeleteRequest>,
) -> Json<Value> {
    let id = request.id.unwrap_or_else(|| session_id(&headers));
    let existed = state.assistant.clear_session(&id);
    Json(json!({
        "success": true,
        "existed": existed,
        "message": format!("Memoria eliminada para la sesión {id}"),
    }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "vera" }))
}
