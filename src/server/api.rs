use axum::{
    routing::{ get, post },
    Router,
    Json,
    extract::State,
    response::{ Html, IntoResponse, Response },
    http::StatusCode,
};
use log::{ info, error };
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{ Any, CorsLayer };
use uuid::Uuid;

use crate::agent::QueryProcessor;
use crate::config::fallback::critical_error_reply;
use crate::history::HistoryStore;
use crate::models::api::{ ChatRequest, ChatResponse, ErrorResponse, HealthResponse };
use crate::models::chat::{ ConversationTurn, UiPayload };
use crate::pipeline::preview;

#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<dyn QueryProcessor>,
    pub history: Arc<dyn HistoryStore>,
    pub index_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(processor: Arc<dyn QueryProcessor>, history: Arc<dyn HistoryStore>) -> Self {
        Self { processor, history, index_path: None }
    }

    pub fn with_index_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.index_path = Some(path.into());
        self
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .layer(cors)
        .with_state(state)
}

async fn index_handler(State(state): State<AppState>) -> Response {
    let not_found = || {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse { detail: "Index HTML not found.".into() }),
        ).into_response()
    };

    let Some(path) = state.index_path else {
        return not_found();
    };
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to read index page {}: {}", path.display(), e);
            not_found()
        }
    }
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok".into() })
}

async fn chat_handler(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Response {
    let request_id = Uuid::new_v4();
    if req.query.trim().is_empty() {
        info!("[{}] Rejected empty query from user {}", request_id, req.user_id);
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse { detail: "Query cannot be empty".into() }),
        ).into_response();
    }
    info!("[{}] /chat called by user: {}, query: '{}'", request_id, req.user_id, preview(&req.query, 60));

    let _turn_guard = state.history.lock_user(&req.user_id).await;
    let history = state.history.get_conversation(&req.user_id).await;

    // Run the core in its own task so a panic inside it still gets an answer.
    let processor = Arc::clone(&state.processor);
    let query = req.query.clone();
    let outcome = tokio::spawn(async move {
        processor.process_user_query(&query, &history).await
    }).await;

    match outcome {
        Ok(result) => {
            state.history.append_turns(
                &req.user_id,
                vec![ConversationTurn::user(req.query.clone()), ConversationTurn::assistant(result.reply.clone())]
            ).await;
            info!(
                "[{}] History for {} updated (component: {})",
                request_id,
                req.user_id,
                result.ui_data.component_type
            );
            Json(ChatResponse::from(result)).into_response()
        }
        Err(join_error) => {
            let kind = if join_error.is_panic() { "Panic" } else { "Cancelled" };
            error!("[{}] Unhandled failure in chat pipeline: {} - {}", request_id, kind, join_error);
            Json(ChatResponse {
                reply: critical_error_reply(kind),
                ui_data: UiPayload::error(format!("Server error: {}", kind)),
            }).into_response()
        }
    }
}
