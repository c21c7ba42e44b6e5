use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use todolist_core::task::UpdateTask;

use super::{failure, store_failure, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/{id}", put(update_task).delete(delete_task))
}

async fn list_tasks(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    let Some(username) = headers.get("username").and_then(|v| v.to_str().ok()) else {
        return failure("not logged in");
    };
    let user = match state.store.find_user(username) {
        Ok(user) => user,
        Err(e) => return store_failure("list tasks", e),
    };
    match state.store.list_tasks(user.id) {
        Ok(tasks) => Json(json!({ "success": true, "tasks": tasks })),
        Err(e) => store_failure("list tasks", e),
    }
}

#[derive(Debug, Deserialize)]
struct CreateBody {
    username: Option<String>,
    title: Option<String>,
    category: Option<String>,
}

async fn create_task(State(state): State<AppState>, Json(body): Json<CreateBody>) -> Json<Value> {
    let (Some(username), Some(title)) = (body.username.as_deref(), body.title.as_deref()) else {
        return failure("missing parameters");
    };
    if username.is_empty() || title.is_empty() {
        return failure("missing parameters");
    }
    let user = match state.store.find_user(username) {
        Ok(user) => user,
        Err(e) => return store_failure("create task", e),
    };
    match state
        .store
        .create_task(user.id, title, body.category.as_deref())
    {
        Ok(_) => Json(json!({ "success": true, "message": "task created" })),
        Err(e) => store_failure("create task", e),
    }
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<UpdateTask>,
) -> Json<Value> {
    match state.store.update_task(id, &update) {
        Ok(_) => Json(json!({ "success": true, "message": "task updated" })),
        Err(e) => store_failure("update task", e),
    }
}

async fn delete_task(State(state): State<AppState>, Path(id): Path<i64>) -> Json<Value> {
    match state.store.delete_task(id) {
        Ok(()) => Json(json!({ "success": true, "message": "task deleted" })),
        Err(e) => store_failure("delete task", e),
    }
}
