use std::net::SocketAddr;

/// Configuration for the stream evaluation server
///
/// # Examples
///
/// ```
/// use calcsrv::StreamConfig;
///
/// let config = StreamConfig {
///     bind_addr: "127.0.0.1:7896".parse().unwrap(),
///     max_connections: 100,
///     max_request_len: 64 * 1024,
/// };
/// ```
///
/// Using the default configuration:
///
/// ```
/// use calcsrv::StreamConfig;
///
/// let config = StreamConfig::default();
/// assert_eq!(config.bind_addr.port(), 7896);
/// ```
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Maximum number of concurrent sessions
    pub max_connections: usize,
    /// Maximum length in bytes of a single framed message
    pub max_request_len: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:7896".parse().unwrap(),
            max_connections: 100,
            max_request_len: 64 * 1024,
        }
    }
}
