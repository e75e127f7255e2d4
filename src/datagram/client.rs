use super::config::DatagramConfig;
use crate::{CalcError, Result};
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Terminal outcome of one datagram exchange.
///
/// Exhaustion is a reported outcome, not an error: it is distinct from
/// socket-level failures, which surface as `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// A reply arrived within the receive window.
    Reply(String),
    /// Every attempt timed out; `attempts` sends were made.
    Exhausted { attempts: u32 },
}

/// Datagram exchange client with bounded retries.
///
/// Delivers one message to a fixed remote endpoint and waits for one reply,
/// tolerating lost packets: each attempt sends the identical message and
/// waits `recv_timeout` for a reply, up to `max_retries` attempts. The first
/// datagram arriving in the window counts as the reply; it is not matched
/// against the request.
///
/// # Examples
///
/// ```no_run
/// use calcsrv::{DatagramClient, DatagramConfig, ExchangeOutcome};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = DatagramClient::bind(DatagramConfig::default()).await?;
///
///     match client.exchange("ping").await? {
///         ExchangeOutcome::Reply(text) => println!("Reply: {}", text),
///         ExchangeOutcome::Exhausted { attempts } => {
///             println!("No response from server after {} attempts.", attempts)
///         }
///     }
///     Ok(())
/// }
/// ```
pub struct DatagramClient {
    socket: UdpSocket,
    config: DatagramConfig,
}

impl DatagramClient {
    /// Binds a local socket for the exchange.
    ///
    /// A socket setup failure here is fatal to the client and is never
    /// retried.
    pub async fn bind(config: DatagramConfig) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(|e| CalcError::Config(format!("Failed to bind UDP socket: {e}")))?;

        Ok(Self { socket, config })
    }

    /// Performs one exchange: send the message, await a reply, retry on
    /// silence.
    ///
    /// Returns as soon as a reply arrives; remaining attempts are skipped.
    /// Never sends more than `max_retries` times and never blocks longer
    /// than `max_retries x recv_timeout` before declaring exhaustion.
    /// Replies longer than `buffer_size` are truncated, not an error.
    pub async fn exchange(&self, message: &str) -> Result<ExchangeOutcome> {
        if message.is_empty() {
            return Err(CalcError::Config("message must not be empty".to_string()));
        }

        let mut buffer = vec![0u8; self.config.buffer_size];

        for attempt in 1..=self.config.max_retries {
            self.socket
                .send_to(message.as_bytes(), self.config.server_addr)
                .await
                .map_err(CalcError::Datagram)?;
            debug!(addr = %self.config.server_addr, attempt, "Sent datagram");

            match timeout(self.config.recv_timeout, self.socket.recv_from(&mut buffer)).await {
                Ok(Ok((n, from))) => {
                    let reply = String::from_utf8_lossy(&buffer[..n]).into_owned();
                    debug!(%from, size = n, attempt, "Received reply");
                    return Ok(ExchangeOutcome::Reply(reply));
                }
                Ok(Err(e)) => return Err(CalcError::Datagram(e)),
                Err(_) => {
                    warn!(attempt, max = self.config.max_retries, "Timeout waiting for reply");
                }
            }
        }

        Ok(ExchangeOutcome::Exhausted {
            attempts: self.config.max_retries,
        })
    }

    /// Local address of the bound socket
    pub fn local_addr(&self) -> Result<std::net::SocketAddr> {
        self.socket.local_addr().map_err(CalcError::Datagram)
    }
}
