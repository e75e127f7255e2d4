use crate::stream::{StreamConfig, StreamServer};
use crate::{CalcError, Result};
use std::net::SocketAddr;
use tokio::task::JoinHandle;

/// Spawns an evaluation server on an ephemeral port for integration tests.
///
/// Returns both the server task handle and the address it is bound to.
pub async fn spawn_test_server() -> Result<(JoinHandle<Result<()>>, SocketAddr)> {
    spawn_test_server_with_limit(100).await
}

/// Same as [`spawn_test_server`] but with a specific session limit.
pub async fn spawn_test_server_with_limit(
    max_connections: usize,
) -> Result<(JoinHandle<Result<()>>, SocketAddr)> {
    use tokio::net::TcpListener;

    // First bind to get the actual address
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|e| CalcError::Config(format!("Failed to bind listener: {e}")))?;
    let addr = listener
        .local_addr()
        .map_err(|e| CalcError::Config(format!("Failed to get local address: {e}")))?;
    drop(listener); // Close the listener so the server can bind to the same address

    let config = StreamConfig {
        bind_addr: addr,
        max_connections,
        ..StreamConfig::default()
    };

    let server = StreamServer::new(config);
    let server_handle = tokio::spawn(async move { server.run().await });

    Ok((server_handle, addr))
}
