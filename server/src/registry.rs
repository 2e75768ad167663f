//! Connection registry and broadcast primitive for the chat relay
//!
//! This module tracks every live connection on the server:
//! - Connection identity and display names
//! - Outbound line queues that any task may push to
//! - Mutually exclusive add, remove and fan-out over the live set
//!
//! The registry is the only state shared between sessions, the admin
//! console and the accept loop. Every operation takes the lock for exactly
//! one mutation or traversal and releases it before returning.

use log::{info, warn};
use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::mpsc::{self, error::SendError};
use tokio::sync::Mutex;

/// Server-assigned identity of one accepted connection
///
/// Two handles are the same connection only if their ids match. Display
/// names are never used as keys because nothing stops two users from
/// picking the same one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u32);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Receiving end of a connection's outbound queue, drained by its writer task
pub type OutboundReceiver = mpsc::UnboundedReceiver<String>;

/// The server's view of one connected client
///
/// Cloning a handle is cheap and every clone refers to the same
/// connection: they share the outbound queue and the display name.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    addr: SocketAddr,
    name: Arc<OnceLock<String>>,
    outbound: mpsc::UnboundedSender<String>,
}

impl ConnectionHandle {
    /// Creates a handle together with the receiver for its outbound queue
    pub fn channel(id: ConnectionId, addr: SocketAddr) -> (Self, OutboundReceiver) {
        let (outbound, receiver) = mpsc::unbounded_channel();
        let handle = Self {
            id,
            addr,
            name: Arc::new(OnceLock::new()),
            outbound,
        };
        (handle, receiver)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Display name, or `None` while the name handshake is still pending
    pub fn name(&self) -> Option<&str> {
        self.name.get().map(String::as_str)
    }

    /// Sets the display name once. Returns false if a name was already set.
    pub fn set_name(&self, name: String) -> bool {
        self.name.set(name).is_ok()
    }

    /// Queues one wire line for delivery to this connection
    ///
    /// Never blocks. Fails only when the connection's writer has already
    /// shut down.
    pub fn send(&self, line: String) -> Result<(), SendError<String>> {
        self.outbound.send(line)
    }
}

/// The process-wide set of live connections
///
/// Callers get atomic operations only; the underlying map is never handed
/// out for iteration.
pub struct ConnectionRegistry {
    /// Live connections indexed by their id
    connections: Mutex<HashMap<ConnectionId, ConnectionHandle>>,
    /// Next id handed out by `next_id`
    next_id: AtomicU32,
}

impl ConnectionRegistry {
    /// Creates an empty registry. Connection ids start from 1.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
            next_id: AtomicU32::new(1),
        }
    }

    /// Allocates a fresh connection id
    pub fn next_id(&self) -> ConnectionId {
        ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Adds a connection to the live set
    ///
    /// Registering the same id twice keeps a single entry.
    pub async fn register(&self, handle: ConnectionHandle) {
        let id = handle.id();
        let addr = handle.addr();
        let count = {
            let mut connections = self.connections.lock().await;
            connections.insert(id, handle);
            connections.len()
        };
        info!("Connection {} registered from {} ({} live)", id, addr, count);
    }

    /// Removes a connection from the live set
    ///
    /// Returns true if the connection was present. Removing an absent
    /// connection is a no-op.
    pub async fn deregister(&self, id: ConnectionId) -> bool {
        let removed = self.connections.lock().await.remove(&id);
        match removed {
            Some(handle) => {
                info!("Connection {} deregistered ({})", id, handle.addr());
                true
            }
            None => false,
        }
    }

    /// Pushes a wire line to every live connection except `exclude`
    ///
    /// The line must already be encoded; it is delivered as-is. A failed
    /// push to one connection is logged and skipped without affecting the
    /// others, and the dead connection is left for its own session to
    /// remove. Returns the number of connections the line was queued for.
    pub async fn broadcast(&self, line: &str, exclude: Option<ConnectionId>) -> usize {
        let connections = self.connections.lock().await;
        let mut delivered = 0;

        for (id, handle) in connections.iter() {
            if Some(*id) == exclude {
                continue;
            }

            match handle.send(line.to_string()) {
                Ok(()) => delivered += 1,
                Err(e) => warn!("Failed to queue line for connection {}: {}", id, e),
            }
        }

        delivered
    }

    /// Returns true if the connection is currently live
    pub async fn contains(&self, id: ConnectionId) -> bool {
        self.connections.lock().await.contains_key(&id)
    }

    /// Snapshot of the display names of every named live connection
    pub async fn names(&self) -> Vec<String> {
        let connections = self.connections.lock().await;
        let mut names: Vec<String> = connections
            .values()
            .filter_map(|handle| handle.name().map(str::to_string))
            .collect();
        names.sort();
        names
    }

    /// Returns the number of live connections
    pub async fn len(&self) -> usize {
        self.connections.lock().await.len()
    }

    /// Returns true if no connections are live
    pub async fn is_empty(&self) -> bool {
        self.connections.lock().await.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
