//! # Chat Relay Server Library
//!
//! This library provides the server side of a single-room, line-based chat
//! relay. Clients connect over TCP, pick a display name, and every line they
//! send is relayed to every other connected client. The operator can inject
//! announcements from the server console.
//!
//! ## Core Responsibilities
//!
//! ### Connection Tracking
//! Every accepted connection is represented by a `ConnectionHandle` and kept
//! in the shared `ConnectionRegistry` for as long as its session lives.
//!
//! ### Broadcasting
//! The registry fans one wire line out to every live connection, optionally
//! excluding the sender. A failing target never stops delivery to the rest.
//!
//! ### Session Lifecycle
//! Each connection runs through `Connecting -> AwaitingName -> Active ->
//! Closed`, with one terminal handler reachable from every exit path.
//!
//! ## Architecture Design
//!
//! ### Task per Connection
//! The accept loop spawns a session task and an outbound writer task per
//! connection. Sessions read sequentially, so one sender's lines reach the
//! others in the order they were sent. No ordering is promised across
//! different senders.
//!
//! ### Outbound Queues
//! Broadcasting only pushes onto each connection's unbounded queue, so a slow
//! peer never stalls the registry lock. A peer that stops reading lets its
//! queue grow without bound; this is a known limitation.
//!
//! ### Wire Encoding
//! Lines are shifted with `shared::encode` before they leave the server and
//! shifted back with `shared::decode` when they arrive. The registry itself
//! never transforms content.
//!
//! ## Module Organization
//!
//! ### Registry Module (`registry`)
//! Connection identity, outbound queues and the broadcast primitive.
//!
//! ### Session Module (`session`)
//! The per-connection state machine.
//!
//! ### Admin Module (`admin`)
//! The operator console loop.
//!
//! ### Listener Module (`listener`)
//! TCP binding, the accept loop and per-connection writer tasks.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::admin::run_admin_console;
//! use server::listener::Server;
//! use tokio::io::BufReader;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::new("0.0.0.0:54321").await?;
//!
//!     let registry = server.registry();
//!     tokio::spawn(async move {
//!         run_admin_console(registry, BufReader::new(tokio::io::stdin())).await;
//!     });
//!
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod admin;
pub mod error;
pub mod listener;
pub mod registry;
pub mod session;
