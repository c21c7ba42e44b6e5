pub mod auth;
mod routes;
pub mod store;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;

use store::MemoryStore;

pub fn router(store: MemoryStore) -> Router {
    routes::build_router(store)
}

pub async fn serve(listener: TcpListener, store: MemoryStore) -> Result<()> {
    axum::serve(listener, router(store)).await?;
    Ok(())
}
