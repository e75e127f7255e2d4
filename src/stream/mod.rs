//! Stream-based evaluation server and client.
//!
//! This module provides the connection-oriented half of the service: a
//! concurrent TCP server that evaluates one arithmetic expression per framed
//! request, and a line-oriented client that relays expressions to it.

pub mod client;
pub mod config;
pub mod server;
pub mod wire;

pub use client::{ClientConfig, StreamClient, repl};
pub use config::StreamConfig;
pub use server::StreamServer;
