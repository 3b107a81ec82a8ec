//! HTTP surface: `POST /api/chat` and `GET /api/health`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use twinchat_core::error::Error;
use twinchat_core::types::{ChatRequest, HistoryTurn};
use twinchat_hybrid::{require_message, ChatPipeline};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ChatPipeline>,
}

impl AppState {
    pub fn new(pipeline: ChatPipeline) -> Self { Self { pipeline: Arc::new(pipeline) } }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/health", get(health))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatBody {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub history: Vec<HistoryTurn>,
}

pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::Validation(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response(),
            ApiError::Internal(detail) => {
                error!("Chat error: {}", detail);
                let body = json!({ "error": "Something went wrong", "message": "Please try again later" });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn chat(State(state): State<AppState>, body: Result<Json<ChatBody>, JsonRejection>) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(body) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let message = require_message(body.message)?;
    let request = ChatRequest { session_id: body.session_id, message, history: body.history };

    // A panic inside a stage becomes a 500 instead of a dropped connection.
    let pipeline = state.pipeline.clone();
    let outcome = tokio::spawn(async move { pipeline.respond(request).await })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "success": true,
        "response": outcome.response,
        "timestamp": timestamp(),
    })))
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "OK",
        "timestamp": timestamp(),
        "message": format!("{} Portfolio Backend is running", state.pipeline.persona()),
    }))
}

/// Serve until Ctrl-C.
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!("🚀 Server running on {}", addr);
    info!("📱 Health check: http://{}/api/health", addr);
    info!("💬 Chat endpoint: http://{}/api/chat", addr);
    axum::serve(listener, router(state)).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("🛑 Shutting down");
}
