//! Datagram-based exchange client.
//!
//! This module provides the connectionless half of the service: a UDP client
//! that wraps one request/reply exchange in a timeout plus fixed-attempt
//! retry loop, turning an unreliable one-shot send into a best-effort
//! reliable exchange. The datagram server side is external.

pub mod client;
pub mod config;

pub use client::{DatagramClient, ExchangeOutcome};
pub use config::DatagramConfig;
