//! JSON envelopes exchanged with the task service.
//!
//! Every endpoint answers with a body carrying `success` and an optional
//! human-readable `message`; failures are reported in-band, not by status code.

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Reply of the create/update/delete and register endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Ack {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
        }
    }

    pub fn failed(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
        }
    }
}

/// Reply of `GET /api/tasks`. A missing `tasks` field means the listing failed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskListReply {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub tasks: Option<Vec<Task>>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
