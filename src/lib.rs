use thiserror::Error;

/// Error types for the calcsrv library
#[derive(Error, Debug)]
pub enum CalcError {
    /// Stream transport errors (bind, connect, read, write)
    #[error("Stream error: {0}")]
    Stream(#[from] std::io::Error),

    /// Datagram transport errors (bind, send, receive)
    #[error("Datagram error: {0}")]
    Datagram(std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Framing errors (oversized or malformed length prefix)
    #[error("Frame error: {0}")]
    Frame(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// UTF-8 encoding errors
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result type for the calcsrv library
pub type Result<T> = std::result::Result<T, CalcError>;

pub mod datagram;
pub mod eval;
pub mod stream;
pub mod test_utils;

// Re-export main types for convenience
pub use datagram::{DatagramClient, DatagramConfig, ExchangeOutcome};
pub use eval::{EvalError, evaluate};
pub use stream::{StreamClient, StreamConfig, StreamServer};
