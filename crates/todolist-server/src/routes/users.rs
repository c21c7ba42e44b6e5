use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use todolist_core::user::validate_password;
use tracing::info;

use super::{failure, store_failure, AppState};
use crate::auth::sha256_hex;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
}

#[derive(Debug, Deserialize)]
struct AuthBody {
    username: Option<String>,
    password: Option<String>,
}

impl AuthBody {
    fn fields(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some((u, p)),
            _ => None,
        }
    }
}

async fn register(State(state): State<AppState>, Json(body): Json<AuthBody>) -> Json<Value> {
    let Some((username, password)) = body.fields() else {
        return failure("username and password are required");
    };
    if let Err(e) = validate_password(password) {
        return store_failure("register", e);
    }
    match state.store.create_user(username, &sha256_hex(password)) {
        Ok(user) => {
            info!("registered user {} ({})", user.username, user.id);
            Json(json!({ "success": true, "message": "registration successful" }))
        }
        Err(e) => store_failure("register", e),
    }
}

async fn login(State(state): State<AppState>, Json(body): Json<AuthBody>) -> Json<Value> {
    let Some((username, password)) = body.fields() else {
        return failure("username and password are required");
    };
    match state.store.find_user(username) {
        Ok(user) if user.password_hash == sha256_hex(password) => Json(json!({
            "success": true,
            "user_id": user.id,
            "username": user.username,
        })),
        _ => failure("invalid username or password"),
    }
}
