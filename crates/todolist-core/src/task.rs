use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Category stored for tasks created or edited with a blank category.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Server-assigned task identifier.
///
/// The task service may send ids as JSON numbers or strings; both are
/// accepted and kept as their decimal/string form. Never generated locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for TaskId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => TaskId::from(n),
            Raw::Str(s) => TaskId(s),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub completed: bool,
    /// Display-only timestamp, passed through as the server formats it.
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTask {
    pub username: String,
    pub title: String,
    pub category: String,
}

impl CreateTask {
    /// Build a create request, substituting [`UNCATEGORIZED`] for a blank category.
    pub fn new(username: &str, title: &str, category: &str) -> Self {
        Self {
            username: username.to_string(),
            title: title.to_string(),
            category: normalize_category(category),
        }
    }
}

/// Partial update body for `PUT /api/tasks/{id}`. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl UpdateTask {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }

    /// Title/category edit; the category is normalized like on create.
    pub fn details(title: &str, category: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            category: Some(normalize_category(category)),
            completed: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.category.is_none() && self.completed.is_none()
    }
}

pub fn normalize_category(category: &str) -> String {
    if category.trim().is_empty() {
        UNCATEGORIZED.to_string()
    } else {
        category.to_string()
    }
}

/// True when a title has no visible characters and must not be sent.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
