use super::config::StreamConfig;
use super::wire;
use crate::eval;
use crate::{CalcError, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tracing::{Instrument, debug, error, info, warn};

/// Concurrent stream evaluation server.
///
/// Accepts connections indefinitely and serves each one an independent,
/// ordered request/response session: one framed expression in, one framed
/// result out, until the client disconnects. Sessions run on their own Tokio
/// tasks and share no mutable state, so the accept loop never blocks on
/// session work.
///
/// # Examples
///
/// Basic server setup and running:
///
/// ```no_run
/// use calcsrv::{StreamConfig, StreamServer};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = StreamConfig {
///         bind_addr: "127.0.0.1:7896".parse()?,
///         ..StreamConfig::default()
///     };
///
///     let server = StreamServer::new(config);
///     server.run().await?;
///     Ok(())
/// }
/// ```
///
/// Server with graceful shutdown:
///
/// ```no_run
/// use calcsrv::{StreamConfig, StreamServer};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let server = StreamServer::new(StreamConfig::default());
///     let shutdown_signal = server.shutdown_signal();
///
///     let server_handle = tokio::spawn(async move { server.run().await });
///
///     // Do other work...
///
///     let _ = shutdown_signal.send(());
///     server_handle.await??;
///     Ok(())
/// }
/// ```
pub struct StreamServer {
    config: StreamConfig,
    shutdown_signal: Arc<tokio::sync::broadcast::Sender<()>>,
}

impl StreamServer {
    /// Creates a new stream evaluation server with the given configuration
    pub fn new(config: StreamConfig) -> Self {
        let (shutdown_signal, _) = tokio::sync::broadcast::channel(1);
        Self {
            config,
            shutdown_signal: Arc::new(shutdown_signal),
        }
    }

    /// Starts the server and listens for connections.
    ///
    /// A bind failure is fatal and reported once. A failure to accept one
    /// connection is logged and does not stop the accept loop; an I/O error
    /// inside a session ends that session only.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await.map_err(|e| {
            CalcError::Config(format!("Failed to bind {}: {}", self.config.bind_addr, e))
        })?;

        info!(address = %self.config.bind_addr, "Evaluation server listening");

        let session_count = Arc::new(AtomicUsize::new(0));
        let mut shutdown_rx = self.shutdown_signal.subscribe();

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, addr)) => {
                            let current = session_count.load(Ordering::SeqCst);
                            if current >= self.config.max_connections {
                                warn!(%addr, current, limit = self.config.max_connections, "Connection rejected: limit reached");
                                continue;
                            }

                            session_count.fetch_add(1, Ordering::SeqCst);
                            let new_count = session_count.load(Ordering::SeqCst);
                            info!(%addr, current = new_count, "Accepted connection");

                            let config = self.config.clone();
                            let session_count = session_count.clone();
                            let span = tracing::info_span!("session", %addr);
                            tokio::spawn(async move {
                                if let Err(e) = Self::handle_session(stream, addr, config).instrument(span).await {
                                    error!(%addr, error = %e, "Session ended with error");
                                }
                                let remaining = session_count.fetch_sub(1, Ordering::SeqCst) - 1;
                                info!(%addr, current = remaining, "Session closed");
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "Failed to accept connection");
                        }
                    }
                }
                _ = signal::ctrl_c() => {
                    info!("Received shutdown signal, stopping server");
                    break;
                }
                _ = shutdown_rx.recv() => {
                    info!("Received internal shutdown signal, stopping server");
                    break;
                }
            }
        }

        info!("Evaluation server stopped");
        Ok(())
    }

    /// Serves one session to completion.
    ///
    /// Strict request/response alternation: the next request is not read
    /// until the previous response has been written. Evaluation failures are
    /// answered like any result and never end the session; the socket is
    /// released when this future returns, on every exit path.
    async fn handle_session(
        mut stream: TcpStream,
        addr: SocketAddr,
        config: StreamConfig,
    ) -> Result<()> {
        loop {
            let request = match wire::read_frame(&mut stream, config.max_request_len).await? {
                Some(request) => request,
                None => {
                    info!(%addr, "Client disconnected");
                    break;
                }
            };

            debug!(%addr, request = %request, "Received request");

            let response = match eval::evaluate(&request) {
                Ok(value) => value,
                Err(e) => format!("Error evaluating expression: {e}"),
            };

            wire::write_frame(&mut stream, &response, config.max_request_len).await?;
            debug!(%addr, response = %response, "Sent response");
        }

        Ok(())
    }

    /// Returns a shutdown signal sender that can be used to gracefully shutdown the server
    pub fn shutdown_signal(&self) -> tokio::sync::broadcast::Sender<()> {
        self.shutdown_signal.as_ref().clone()
    }
}
