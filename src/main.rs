use calcsrv::datagram::{DatagramClient, DatagramConfig, ExchangeOutcome};
use calcsrv::stream::{self, StreamClient, StreamConfig, StreamServer};
use color_eyre::eyre::{Result, WrapErr, eyre};
use tokio::io::BufReader;

use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("calcsrv=info")
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Default to serving if no mode specified
    let mode = args
        .get(1)
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "serve".to_string());

    match mode.as_str() {
        "serve" => {
            let port = args
                .get(2)
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(7896);

            let config = StreamConfig {
                bind_addr: format!("0.0.0.0:{}", port).parse().unwrap(),
                max_connections: 1000, // Higher limit for production use
                ..StreamConfig::default()
            };

            info!(address = %config.bind_addr, max_connections = config.max_connections, "Starting evaluation server");

            let server = StreamServer::new(config);
            server.run().await.wrap_err("Failed to run evaluation server")?;
        }
        "repl" => {
            let addr = args
                .get(2)
                .cloned()
                .unwrap_or_else(|| "127.0.0.1:7896".to_string());
            let addr = addr
                .parse()
                .wrap_err_with(|| format!("Invalid server address '{addr}'"))?;

            let mut client = StreamClient::connect(addr)
                .await
                .wrap_err("Failed to connect to evaluation server")?;

            println!("Enter arithmetic expressions (type 'exit' to quit):");

            let stdin = BufReader::new(tokio::io::stdin());
            stream::repl(&mut client, stdin, tokio::io::stdout())
                .await
                .wrap_err("Client error")?;
        }
        "send" => {
            let (message, hostname) = match (args.get(2), args.get(3)) {
                (Some(message), Some(hostname)) if !message.is_empty() => (message, hostname),
                _ => {
                    eprintln!("Usage: {} send <message> <hostname> [port]", args[0]);
                    return Ok(());
                }
            };
            let port = args
                .get(4)
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(6789);

            let server_addr = tokio::net::lookup_host((hostname.as_str(), port))
                .await
                .wrap_err_with(|| format!("Unknown host '{hostname}'"))?
                .next()
                .ok_or_else(|| eyre!("Unknown host '{hostname}'"))?;

            let config = DatagramConfig {
                server_addr,
                ..DatagramConfig::default()
            };

            let client = DatagramClient::bind(config).await.wrap_err("Socket error")?;
            match client.exchange(message).await.wrap_err("IO error")? {
                ExchangeOutcome::Reply(reply) => println!("Reply: {reply}"),
                ExchangeOutcome::Exhausted { attempts } => {
                    println!("No response from server after {attempts} attempts.")
                }
            }
        }
        _ => {
            eprintln!("Usage: {} [serve|repl|send] [options]", args[0]);
            eprintln!("  serve [port]                    Run the evaluation server (default port: 7896)");
            eprintln!("  repl [host:port]                Interactive client (default: 127.0.0.1:7896)");
            eprintln!("  send <message> <hostname> [port]  One datagram exchange (default port: 6789)");
            eprintln!();
            eprintln!("Examples:");
            eprintln!("  {} serve 7896                 # Evaluation server on port 7896", args[0]);
            eprintln!("  {} repl 127.0.0.1:7896        # Enter expressions interactively", args[0]);
            eprintln!("  {} send ping localhost        # Send one datagram, retry on silence", args[0]);
            std::process::exit(1);
        }
    }

    Ok(())
}
