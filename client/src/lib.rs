//! # Chat Relay Client Library
//!
//! This library provides the console client for the chat relay. It connects
//! to the server over TCP, prints every line the server relays and forwards
//! console input as chat messages.
//!
//! ## Wire Contract
//!
//! Each message is one newline-terminated line passed through
//! `shared::encode` before it is sent and `shared::decode` after it is
//! received. The shift constant comes from the `shared` crate, so client and
//! server builds always agree on it.
//!
//! ## Module Organization
//!
//! ### Commands Module (`commands`)
//! Classifies console input into local slash-commands (`/help`, `/exit`)
//! and chat messages. Commands are handled locally and never sent.
//!
//! ### Network Module (`network`)
//! Owns the TCP connection and runs the receive/send loop until the user
//! exits, the server hangs up or console input ends.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::network::Client;
//! use tokio::io::BufReader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::connect("127.0.0.1:54321").await?;
//!     client
//!         .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod network;
