use tokio::net::TcpListener;

use crate::store::MemoryStore;

/// A running test server with base_url and background task handle.
pub struct TestServer {
    pub base_url: String,
    pub store: MemoryStore,
    _handle: tokio::task::JoinHandle<()>,
}

/// Spawn an axum test server on a random port with an empty in-memory store.
/// Returns the TestServer with the `base_url` (e.g. "http://127.0.0.1:12345").
pub async fn spawn_test_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let store = MemoryStore::new();
    let app = crate::router(store.clone());
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base_url,
        store,
        _handle: handle,
    }
}
