use calcsrv::{DatagramClient, DatagramConfig, ExchangeOutcome};
use color_eyre::eyre::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;

fn test_config(server_addr: SocketAddr) -> DatagramConfig {
    DatagramConfig {
        server_addr,
        max_retries: 3,
        recv_timeout: Duration::from_millis(100),
        buffer_size: 1000,
    }
}

/// Spawns a responder that ignores the first `drop_count` datagrams and
/// echoes every one after that, counting each receive.
async fn spawn_responder(drop_count: usize) -> Result<(SocketAddr, Arc<AtomicUsize>)> {
    let socket = UdpSocket::bind("127.0.0.1:0").await?;
    let addr = socket.local_addr()?;
    let received = Arc::new(AtomicUsize::new(0));

    let counter = received.clone();
    tokio::spawn(async move {
        let mut buf = [0u8; 1500];
        while let Ok((n, from)) = socket.recv_from(&mut buf).await {
            let seen = counter.fetch_add(1, Ordering::SeqCst) + 1;
            if seen > drop_count {
                let _ = socket.send_to(&buf[..n], from).await;
            }
        }
    });

    Ok((addr, received))
}

#[tokio::test]
async fn test_reply_on_first_attempt_means_one_send() -> Result<()> {
    let (addr, received) = spawn_responder(0).await?;

    let client = DatagramClient::bind(test_config(addr)).await?;
    let outcome = client.exchange("ping").await?;
    assert_eq!(outcome, ExchangeOutcome::Reply("ping".to_string()));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(received.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_retries_until_reply_arrives() -> Result<()> {
    // The first two sends go unanswered; the third gets the reply
    let (addr, received) = spawn_responder(2).await?;

    let client = DatagramClient::bind(test_config(addr)).await?;
    let outcome = client.exchange("ping").await?;
    assert_eq!(outcome, ExchangeOutcome::Reply("ping".to_string()));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(received.load(Ordering::SeqCst), 3);
    Ok(())
}

#[tokio::test]
async fn test_exhaustion_after_exactly_max_retries() -> Result<()> {
    // A responder that never replies
    let (addr, received) = spawn_responder(usize::MAX).await?;

    let client = DatagramClient::bind(test_config(addr)).await?;
    let started = Instant::now();
    let outcome = client.exchange("ping").await?;
    let elapsed = started.elapsed();

    assert_eq!(outcome, ExchangeOutcome::Exhausted { attempts: 3 });
    // Waited out every window, but stayed bounded
    assert!(elapsed >= Duration::from_millis(300), "elapsed: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(1500), "elapsed: {elapsed:?}");

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(received.load(Ordering::SeqCst), 3);
    Ok(())
}

#[tokio::test]
async fn test_long_reply_is_truncated_to_buffer_size() -> Result<()> {
    let socket = UdpSocket::bind("127.0.0.1:0").await?;
    let addr = socket.local_addr()?;

    tokio::spawn(async move {
        let mut buf = [0u8; 64];
        if let Ok((_, from)) = socket.recv_from(&mut buf).await {
            let _ = socket.send_to(&vec![b'x'; 1200], from).await;
        }
    });

    let client = DatagramClient::bind(test_config(addr)).await?;
    match client.exchange("ping").await? {
        ExchangeOutcome::Reply(reply) => assert_eq!(reply.len(), 1000),
        other => panic!("expected a reply, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_empty_message_reports_usage_error_without_sending() -> Result<()> {
    let (addr, received) = spawn_responder(0).await?;

    let client = DatagramClient::bind(test_config(addr)).await?;
    assert!(client.exchange("").await.is_err());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(received.load(Ordering::SeqCst), 0);
    Ok(())
}
