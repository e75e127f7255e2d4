use std::net::SocketAddr;
use std::time::Duration;

/// Configuration for the datagram exchange client
///
/// # Examples
///
/// ```
/// use calcsrv::DatagramConfig;
/// use std::time::Duration;
///
/// let config = DatagramConfig {
///     server_addr: "127.0.0.1:6789".parse().unwrap(),
///     max_retries: 3,
///     recv_timeout: Duration::from_millis(2000),
///     buffer_size: 1000,
/// };
/// ```
#[derive(Debug, Clone)]
pub struct DatagramConfig {
    /// Remote endpoint the exchange is addressed to
    pub server_addr: SocketAddr,
    /// Maximum number of send attempts per exchange
    pub max_retries: u32,
    /// How long to wait for a reply after each send
    pub recv_timeout: Duration,
    /// Receive buffer size; longer replies are truncated
    pub buffer_size: usize,
}

impl Default for DatagramConfig {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:6789".parse().unwrap(),
            max_retries: 3,
            recv_timeout: Duration::from_millis(2000),
            buffer_size: 1000,
        }
    }
}
