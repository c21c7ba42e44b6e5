use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use todolist_core::api::{Ack, LoginReply, TaskListReply};
use todolist_core::task::{CreateTask, Task, TaskId, UpdateTask};
use todolist_core::user::{Credentials, Registration};
use tracing::debug;

use crate::{ServiceError, TaskService};

/// Header carrying the caller's identity on `GET /api/tasks`.
const USERNAME_HEADER: &str = "username";

/// Async HTTP client implementation of TaskService.
/// Talks to a task server speaking the `{ success, message }` JSON envelope.
pub struct HttpService {
    base_url: String,
    client: Client,
}

impl HttpService {
    /// Client without a request timeout; a stalled server stalls the caller.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Internal(format!("build http client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the server is reachable.
    pub async fn health_check(&self) -> Result<(), ServiceError> {
        let resp = self
            .client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await
            .map_err(|e| ServiceError::Internal(format!("connection failed: {e}")))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ServiceError::Internal(format!(
                "health check failed: {}",
                resp.status()
            )))
        }
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ServiceError> {
        let resp = builder
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }

    async fn post_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        let builder = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body);
        self.send_json(builder).await
    }

    async fn put_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        let builder = self
            .client
            .put(format!("{}{path}", self.base_url))
            .json(body);
        self.send_json(builder).await
    }

    async fn delete_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ServiceError> {
        let builder = self.client.delete(format!("{}{path}", self.base_url));
        self.send_json(builder).await
    }

    // -- Account endpoints (not on trait) --

    /// Create an account. Returns the server's confirmation message.
    ///
    /// The form is validated locally first; an invalid form never reaches the
    /// server.
    pub async fn register(&self, form: &Registration) -> Result<String, ServiceError> {
        form.validate()?;
        let ack: Ack = self
            .post_json("/api/register", &form.credentials())
            .await?;
        match ack {
            Ack {
                success: true,
                message,
            } => Ok(message.unwrap_or_else(|| "registered".into())),
            Ack { message, .. } => Err(ServiceError::Rejected(message)),
        }
    }

    /// Verify credentials. Returns the username the server confirmed.
    pub async fn login(&self, credentials: &Credentials) -> Result<String, ServiceError> {
        credentials.validate()?;
        let reply: LoginReply = self.post_json("/api/login", credentials).await?;
        if reply.success {
            debug!("logged in as {}", credentials.username);
            Ok(reply
                .username
                .unwrap_or_else(|| credentials.username.clone()))
        } else {
            Err(ServiceError::Rejected(reply.message))
        }
    }
}

fn expect_success(ack: Ack) -> Result<(), ServiceError> {
    if ack.success {
        Ok(())
    } else {
        Err(ServiceError::Rejected(ack.message))
    }
}

/// Tasks of a listing reply. An explicit `success: false` rejects the reply
/// even when it carries tasks.
fn tasks_from_reply(reply: TaskListReply) -> Result<Vec<Task>, ServiceError> {
    match reply {
        TaskListReply {
            success: Some(false),
            message,
            ..
        }
        | TaskListReply {
            tasks: None,
            message,
            ..
        } => Err(ServiceError::Rejected(message)),
        TaskListReply {
            tasks: Some(tasks), ..
        } => Ok(tasks),
    }
}

async fn handle_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        resp.json::<T>()
            .await
            .map_err(|e| ServiceError::Internal(format!("json decode: {e}")))
    } else {
        Err(parse_error_with_status(status, resp).await)
    }
}

async fn parse_error_with_status(status: StatusCode, resp: reqwest::Response) -> ServiceError {
    let body = resp.text().await.unwrap_or_default();
    let msg = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v["message"]
                .as_str()
                .or_else(|| v["error"].as_str())
                .map(String::from)
        })
        .unwrap_or(body);

    if status == StatusCode::NOT_FOUND {
        ServiceError::NotFound(msg)
    } else if status == StatusCode::BAD_REQUEST {
        ServiceError::InvalidInput(msg)
    } else {
        ServiceError::Internal(format!("{status}: {msg}"))
    }
}

#[async_trait]
impl TaskService for HttpService {
    async fn list_tasks(&self, username: &str) -> Result<Vec<Task>, ServiceError> {
        let builder = self
            .client
            .get(format!("{}/api/tasks", self.base_url))
            .header(USERNAME_HEADER, username);
        let reply: TaskListReply = self.send_json(builder).await?;
        tasks_from_reply(reply)
    }

    async fn create_task(&self, input: &CreateTask) -> Result<(), ServiceError> {
        let ack: Ack = self.post_json("/api/tasks", input).await?;
        expect_success(ack)
    }

    async fn update_task(&self, id: &TaskId, update: &UpdateTask) -> Result<(), ServiceError> {
        let ack: Ack = self.put_json(&format!("/api/tasks/{id}"), update).await?;
        expect_success(ack)
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), ServiceError> {
        let ack: Ack = self.delete_json(&format!("/api/tasks/{id}")).await?;
        expect_success(ack)
    }
}
