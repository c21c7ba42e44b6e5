use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use todolist_core::task::{CreateTask, Task, TaskId, UpdateTask};
use todolist_core::TodoError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The server answered `success: false`, with its message if it sent one.
    #[error("rejected: {}", .0.as_deref().unwrap_or("no message"))]
    Rejected(Option<String>),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Message suitable for showing to the user (auth forms only).
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Rejected(Some(msg)) => msg.clone(),
            ServiceError::InvalidInput(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<TodoError> for ServiceError {
    fn from(e: TodoError) -> Self {
        match e {
            TodoError::NotFound(msg) => ServiceError::NotFound(msg),
            TodoError::InvalidInput(msg) => ServiceError::InvalidInput(msg),
            TodoError::Internal(msg) => ServiceError::Internal(msg),
        }
    }
}

/// The remote task store.
///
/// Writes report only success or failure; callers re-list to observe the
/// result. `HttpService` is the production implementation.
#[async_trait]
pub trait TaskService: Send + Sync {
    async fn list_tasks(&self, username: &str) -> Result<Vec<Task>, ServiceError>;
    async fn create_task(&self, input: &CreateTask) -> Result<(), ServiceError>;
    async fn update_task(&self, id: &TaskId, update: &UpdateTask) -> Result<(), ServiceError>;
    async fn delete_task(&self, id: &TaskId) -> Result<(), ServiceError>;
}

#[async_trait]
impl<T: TaskService + ?Sized> TaskService for Arc<T> {
    async fn list_tasks(&self, username: &str) -> Result<Vec<Task>, ServiceError> {
        (**self).list_tasks(username).await
    }

    async fn create_task(&self, input: &CreateTask) -> Result<(), ServiceError> {
        (**self).create_task(input).await
    }

    async fn update_task(&self, id: &TaskId, update: &UpdateTask) -> Result<(), ServiceError> {
        (**self).update_task(id, update).await
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), ServiceError> {
        (**self).delete_task(id).await
    }
}
