use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use hisab_assistant::{resolve_display_name, ChatReply, FallbackOrchestrator, ParseReply};
use hisab_core::Transaction;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<FallbackOrchestrator>,
}

impl AppState {
    pub fn new(assistant: FallbackOrchestrator) -> Self {
        Self {
            assistant: Arc::new(assistant),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub expenses_data: Option<Vec<Transaction>>,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub group_expenses_data: Option<Vec<Transaction>>,
}

impl ChatRequest {
    /// Group data when both a group name and group rows are present,
    /// personal data otherwise.
    fn scope(&self) -> (&[Transaction], String) {
        let group_name = self.group_name.as_deref().map(str::trim).filter(|n| !n.is_empty());
        let group_rows = self.group_expenses_data.as_deref().filter(|rows| !rows.is_empty());
        match (group_name, group_rows) {
            (Some(name), Some(rows)) => (rows, format!("group '{name}'")),
            _ => (
                self.expenses_data.as_deref().unwrap_or_default(),
                "personal".to_string(),
            ),
        }
    }
}

pub fn router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/expenses/parse", post(parse_expenses))
        .route("/api/expenses/chat", post(chat))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn parse_expenses(
    State(state): State<AppState>,
    Json(req): Json<ParseRequest>,
) -> Json<ParseReply> {
    debug!(len = req.text.len(), "Parse request");
    Json(state.assistant.parse_expenses(&req.text).await)
}

async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Json<ChatReply> {
    let name = resolve_display_name(req.user_name.as_deref(), req.user_email.as_deref());
    let (transactions, scope) = req.scope();
    debug!(count = transactions.len(), %scope, "Chat request");
    Json(
        state
            .assistant
            .answer_query(&req.text, transactions, &name, &scope)
            .await,
    )
}
