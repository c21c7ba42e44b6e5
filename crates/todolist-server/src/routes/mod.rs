pub mod health;
pub mod tasks;
pub mod users;

use std::sync::Arc;

use axum::{Json, Router};
use serde_json::{json, Value};
use todolist_core::TodoError;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::store::MemoryStore;

pub struct InnerAppState {
    pub store: MemoryStore,
}

pub type AppState = Arc<InnerAppState>;

pub fn build_router(store: MemoryStore) -> Router {
    let state = Arc::new(InnerAppState { store });
    Router::new()
        .merge(health::routes())
        .merge(users::routes())
        .merge(tasks::routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Failures travel in-band: HTTP 200 with `success: false`.
fn failure(message: &str) -> Json<Value> {
    Json(json!({ "success": false, "message": message }))
}

fn store_failure(context: &str, e: TodoError) -> Json<Value> {
    warn!("{context}: {e}");
    match e {
        TodoError::NotFound(msg) | TodoError::InvalidInput(msg) => failure(&msg),
        TodoError::Internal(_) => failure("internal server error"),
    }
}
