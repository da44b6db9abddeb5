use crate::chat;
use crate::config::Config;
use crate::db::{ChatMessage, Database};
use crate::error::ChatError;
use crate::languages;
use crate::security::constant_time_compare;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub http: reqwest::Client,
}

/// JSON error body matching the original wire shape: `{"message": "..."}`.
struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Unauthorized",
        }
    }

    fn bad_request(message: &'static str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }

    fn server_error() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "message": self.message })),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub message: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Serialize)]
struct SubmitResponse {
    messages: [ChatMessage; 2],
}

#[derive(Debug, Serialize)]
struct LanguageInfo {
    code: &'static str,
    name: &'static str,
}

/// Resolve the caller's identity from the headers the auth gateway sets.
///
/// The gateway authenticates the user and forwards their id in `x-user-id`;
/// we trust it as-is. When a shared secret is configured, the gateway must
/// also present it in `x-gateway-secret` (compared in constant time).
fn caller_identity(config: &Config, headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(expected) = &config.gateway_shared_secret {
        let presented = headers
            .get("x-gateway-secret")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !constant_time_compare(presented, expected) {
            return Err(ApiError::unauthorized());
        }
    }

    let user_id = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if user_id.is_empty() {
        return Err(ApiError::unauthorized());
    }

    Ok(user_id.to_string())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/languages", get(list_languages))
        .route("/api/chat/message", post(post_message))
        .route("/api/chat/messages", get(get_messages))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn list_languages() -> Json<Vec<LanguageInfo>> {
    let entries = languages::catalog()
        .iter()
        .map(|entry| LanguageInfo {
            code: entry.code,
            name: entry.display_name,
        })
        .collect();
    Json(entries)
}

/// POST /api/chat/message
async fn post_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SubmitRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = caller_identity(&state.config, &headers)?;

    let (user_record, bot_record) = chat::submit_turn(
        &state.db,
        &state.http,
        &state.config,
        &user_id,
        &request.message,
        &request.language,
    )
    .await
    .map_err(|err| match err {
        ChatError::EmptyMessage => ApiError::bad_request("Message is required"),
        ChatError::Persistence(e) => {
            error!("Chat message error: {:#}", e);
            ApiError::server_error()
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            messages: [user_record, bot_record],
        }),
    ))
}

/// GET /api/chat/messages
async fn get_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let user_id = caller_identity(&state.config, &headers)?;

    let messages = state.db.list_for_user(&user_id).map_err(|e| {
        error!("Get messages error: {:#}", e);
        ApiError::server_error()
    })?;

    Ok(Json(messages))
}
