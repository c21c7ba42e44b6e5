use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use todolist_server::store::MemoryStore;

/// Development task server. State lives in memory and is lost on exit.
#[derive(Parser)]
#[command(name = "todolist-server")]
struct Cli {
    /// Address to bind
    #[arg(long, env = "TODOLIST_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(long, env = "TODOLIST_PORT", default_value = "5000")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let addr = SocketAddr::new(
        cli.bind
            .parse()
            .with_context(|| format!("invalid bind address {}", cli.bind))?,
        cli.port,
    );
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("todolist-server listening on http://{addr}");

    todolist_server::serve(listener, MemoryStore::new()).await
}
