//! HTTP API in front of the song agent.
//!
//! - `GET /` reports the service status
//! - `POST /api/agent` runs a lyrics request and registers the result
//! - `POST /api/get_vocabulary` re-serves the vocabulary of an earlier request

use crate::agent::{AgentError, SongAgent};
use crate::models::{HandlerRecord, VocabularyItem};
use crate::registry::HandlerRegistry;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared state of the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<SongAgent>,
    pub registry: HandlerRegistry,
}

impl AppState {
    pub fn new(agent: SongAgent) -> Self {
        Self {
            agent: Arc::new(agent),
            registry: HandlerRegistry::new(),
        }
    }
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown handler id (404)
    #[error("Handler ID not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("Error processing request: {0}")]
    Internal(String),
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        if status.is_server_error() {
            error!("{}", self);
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));
        (status, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message_request: String,
}

#[derive(Debug, Deserialize)]
pub struct HandlerIdRequest {
    pub handler_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LyricsResponse {
    pub lyrics: String,
    pub romanized_lyrics: String,
    pub vocabulary: Vec<VocabularyItem>,
    pub handler_id: String,
    pub lyrics_path: String,
    pub romanized_path: String,
    pub song_title: String,
    pub artist: String,
    pub song_id: String,
    pub found: bool,
}

impl From<&HandlerRecord> for LyricsResponse {
    fn from(record: &HandlerRecord) -> Self {
        Self {
            lyrics: record.result.lyrics.clone(),
            romanized_lyrics: record.result.romanized_lyrics.clone(),
            vocabulary: record.vocabulary.clone(),
            handler_id: record.id.clone(),
            lyrics_path: record.artifact_path.display().to_string(),
            romanized_path: record
                .romanized_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            song_title: record.result.song_title.clone(),
            artist: record.result.artist.clone(),
            song_id: record.song_id.clone(),
            found: record.result.found,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VocabularyResponse {
    pub vocabulary: Vec<VocabularyItem>,
}

/// GET /
async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "status": "API is running",
        "endpoints": ["/api/agent", "/api/get_vocabulary"],
    }))
}

/// POST /api/agent
async fn process_agent_request(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<LyricsResponse>, ApiError> {
    let message = request.message_request.trim();
    if message.is_empty() {
        return Err(ApiError::BadRequest("message_request is empty".to_string()));
    }

    let record = state.agent.process_request(message).await?;
    let response = LyricsResponse::from(&record);
    state.registry.insert(record).await;
    info!("Registered handler {}", response.handler_id);
    Ok(Json(response))
}

/// POST /api/get_vocabulary
async fn get_vocabulary(
    State(state): State<AppState>,
    Json(request): Json<HandlerIdRequest>,
) -> Result<Json<VocabularyResponse>, ApiError> {
    let vocabulary = state
        .registry
        .vocabulary(&request.handler_id)
        .await
        .ok_or(ApiError::NotFound(request.handler_id))?;
    Ok(Json(VocabularyResponse { vocabulary }))
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/agent", post(process_agent_request))
        .route("/api/get_vocabulary", post(get_vocabulary))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the API on `bind` until the process ends
pub async fn serve(state: AppState, bind: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, create_router(state)).await
}
