use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "todolist", about = "Terminal client for the todolist task service")]
pub struct ClientConfig {
    /// Task service URL
    #[arg(long, env = "TODOLIST_SERVER_URL", default_value = "http://localhost:5000")]
    pub server_url: String,

    /// Account whose tasks are shown
    #[arg(long, env = "TODOLIST_USERNAME")]
    pub username: Option<String>,

    /// Password; when set, the client logs in before showing tasks
    #[arg(long, env = "TODOLIST_PASSWORD")]
    pub password: Option<String>,

    /// Log file (the terminal is owned by the UI). Defaults to todolist.log in the temp dir.
    #[arg(long, env = "TODOLIST_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Per-request timeout in seconds. Requests wait indefinitely when unset.
    #[arg(long, env = "TODOLIST_REQUEST_TIMEOUT")]
    pub request_timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account and exit
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout.map(Duration::from_secs)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("todolist.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_server() {
        let config = ClientConfig::try_parse_from(["todolist", "--username", "alice"]).unwrap();
        assert_eq!(config.server_url, "http://localhost:5000");
        assert_eq!(config.username.as_deref(), Some("alice"));
        assert!(config.request_timeout().is_none());
        assert!(config.command.is_none());
        assert!(config.log_path().ends_with("todolist.log"));
    }

    #[test]
    fn timeout_is_seconds() {
        let config =
            ClientConfig::try_parse_from(["todolist", "--request-timeout", "7"]).unwrap();
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(7)));
    }

    #[test]
    fn register_subcommand_parses() {
        let config = ClientConfig::try_parse_from([
            "todolist",
            "register",
            "--username",
            "bob",
            "--password",
            "secret1",
            "--confirm-password",
            "secret1",
        ])
        .unwrap();
        match config.command {
            Some(Command::Register { username, .. }) => assert_eq!(username, "bob"),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
