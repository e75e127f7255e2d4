use super::wire;
use crate::{CalcError, Result};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Configuration for stream clients
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Maximum length in bytes of a single framed message
    pub max_response_len: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            max_response_len: 64 * 1024,
        }
    }
}

/// Stream evaluation client.
///
/// Holds one connection and exchanges strictly alternating request/response
/// pairs over it. The transport is assumed reliable end-to-end, so there is
/// no retry logic and reads wait indefinitely for the response; a transport
/// failure is returned to the caller.
///
/// # Examples
///
/// ```no_run
/// use calcsrv::StreamClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let addr = "127.0.0.1:7896".parse()?;
///     let mut client = StreamClient::connect(addr).await?;
///
///     let response = client.request("3 + 5 * 2").await?;
///     println!("Result: {}", response);
///     Ok(())
/// }
/// ```
pub struct StreamClient {
    stream: TcpStream,
    config: ClientConfig,
}

impl StreamClient {
    /// Connect to a server with custom configuration
    pub async fn connect_with_config(addr: SocketAddr, config: ClientConfig) -> Result<Self> {
        let stream = timeout(config.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| CalcError::Timeout("Connection timeout".to_string()))?
            .map_err(|e| CalcError::Config(format!("Failed to connect to {addr}: {e}")))?;

        Ok(Self { stream, config })
    }

    /// Connect with default configuration
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        Self::connect_with_config(addr, ClientConfig::default()).await
    }

    /// Sends one expression and blocks until exactly one response arrives.
    pub async fn request(&mut self, expression: &str) -> Result<String> {
        wire::write_frame(&mut self.stream, expression, self.config.max_response_len).await?;

        match wire::read_frame(&mut self.stream, self.config.max_response_len).await? {
            Some(response) => Ok(response),
            None => Err(CalcError::Stream(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "server closed the connection",
            ))),
        }
    }
}

/// Line-oriented command loop over one client connection.
///
/// Each line read from `input` is sent verbatim as one request and the
/// response is printed to `output`. The case-insensitive sentinel `exit` or
/// end-of-input terminates the loop; the connection is released when the
/// client is dropped.
pub async fn repl<I, O>(client: &mut StreamClient, input: I, mut output: O) -> Result<()>
where
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        if line.eq_ignore_ascii_case("exit") {
            break;
        }

        let response = client.request(&line).await?;
        output
            .write_all(format!("Result: {response}\n").as_bytes())
            .await?;
        output.flush().await?;
    }

    Ok(())
}
