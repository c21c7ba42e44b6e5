//! In-memory users and tasks.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;
use todolist_core::task::{UpdateTask, UNCATEGORIZED};
use todolist_core::TodoError;

/// Timestamp layout of `created_at`, second resolution.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: String,
}

/// Stored task; serializes to the wire shape with a numeric `id`.
#[derive(Debug, Clone, Serialize)]
pub struct TaskRow {
    pub id: i64,
    #[serde(skip)]
    pub user_id: i64,
    pub title: String,
    pub category: String,
    pub completed: bool,
    pub created_at: String,
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<UserRow>,
    tasks: Vec<TaskRow>,
    next_user_id: i64,
    next_task_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_tables<F, T>(&self, f: F) -> Result<T, TodoError>
    where
        F: FnOnce(&mut Tables) -> Result<T, TodoError>,
    {
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| TodoError::Internal("store lock poisoned".into()))?;
        f(&mut tables)
    }

    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<UserRow, TodoError> {
        self.with_tables(|t| {
            if t.users.iter().any(|u| u.username == username) {
                return Err(TodoError::InvalidInput("username already exists".into()));
            }
            t.next_user_id += 1;
            let user = UserRow {
                id: t.next_user_id,
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                created_at: now(),
            };
            t.users.push(user.clone());
            Ok(user)
        })
    }

    pub fn find_user(&self, username: &str) -> Result<UserRow, TodoError> {
        self.with_tables(|t| {
            t.users
                .iter()
                .find(|u| u.username == username)
                .cloned()
                .ok_or_else(|| TodoError::NotFound("user does not exist".into()))
        })
    }

    /// Tasks owned by `user_id`, newest first.
    pub fn list_tasks(&self, user_id: i64) -> Result<Vec<TaskRow>, TodoError> {
        self.with_tables(|t| {
            let mut tasks: Vec<TaskRow> = t
                .tasks
                .iter()
                .filter(|task| task.user_id == user_id)
                .cloned()
                .collect();
            tasks.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.cmp(&a.id))
            });
            Ok(tasks)
        })
    }

    pub fn create_task(
        &self,
        user_id: i64,
        title: &str,
        category: Option<&str>,
    ) -> Result<TaskRow, TodoError> {
        self.with_tables(|t| {
            t.next_task_id += 1;
            let task = TaskRow {
                id: t.next_task_id,
                user_id,
                title: title.to_string(),
                category: category.unwrap_or(UNCATEGORIZED).to_string(),
                completed: false,
                created_at: now(),
            };
            t.tasks.push(task.clone());
            Ok(task)
        })
    }

    /// Apply the fields present in `update`. Ownership is not checked.
    pub fn update_task(&self, id: i64, update: &UpdateTask) -> Result<TaskRow, TodoError> {
        if update.is_empty() {
            return Err(TodoError::InvalidInput("no fields to update".into()));
        }
        self.with_tables(|t| {
            let task = t
                .tasks
                .iter_mut()
                .find(|task| task.id == id)
                .ok_or_else(|| TodoError::NotFound("task does not exist".into()))?;
            if let Some(ref title) = update.title {
                task.title = title.clone();
            }
            if let Some(ref category) = update.category {
                task.category = category.clone();
            }
            if let Some(completed) = update.completed {
                task.completed = completed;
            }
            Ok(task.clone())
        })
    }

    pub fn delete_task(&self, id: i64) -> Result<(), TodoError> {
        self.with_tables(|t| {
            let before = t.tasks.len();
            t.tasks.retain(|task| task.id != id);
            if t.tasks.len() == before {
                Err(TodoError::NotFound("task does not exist".into()))
            } else {
                Ok(())
            }
        })
    }
}

fn now() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}
