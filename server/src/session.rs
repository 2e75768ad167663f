//! Per-connection session lifecycle
//!
//! A session walks one connection through `Connecting -> AwaitingName ->
//! Active -> Closed`. Every exit path, clean or not, ends in the single
//! terminal handler `close`, which shuts the read side, announces the
//! departure and removes the connection from the registry.

use crate::registry::{ConnectionHandle, ConnectionRegistry};
use log::{error, info};
use shared::{chat_line, decode, encode, join_announcement, leave_announcement, NAME_PROMPT};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepted but not yet registered
    Connecting,
    /// Registered and prompted; the next line is the display name
    AwaitingName,
    /// Named; every line is relayed to the other connections
    Active,
    /// Torn down and removed from the registry
    Closed,
}

/// Drives one accepted connection from registration to teardown
pub struct Session<R> {
    registry: Arc<ConnectionRegistry>,
    handle: ConnectionHandle,
    reader: Option<R>,
    state: SessionState,
}

impl<R> Session<R>
where
    R: AsyncBufRead + Unpin,
{
    pub fn new(registry: Arc<ConnectionRegistry>, handle: ConnectionHandle, reader: R) -> Self {
        Self {
            registry,
            handle,
            reader: Some(reader),
            state: SessionState::Connecting,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Runs the session until the peer disconnects or an I/O error occurs
    ///
    /// Always returns `SessionState::Closed`, after the connection has been
    /// deregistered.
    pub async fn run(mut self) -> SessionState {
        if let Err(e) = self.drive().await {
            error!("I/O error on connection {}: {}", self.handle.id(), e);
        }
        self.close().await;
        self.state
    }

    async fn drive(&mut self) -> io::Result<()> {
        self.register().await;

        if !self.await_name().await? {
            return Ok(());
        }

        while let Some(text) = self.next_text().await? {
            self.relay(&text).await;
        }

        Ok(())
    }

    /// Connecting -> AwaitingName
    async fn register(&mut self) {
        self.registry.register(self.handle.clone()).await;
        self.state = SessionState::AwaitingName;

        // Goes to every connection, not just the new one
        self.registry.broadcast(&encode(NAME_PROMPT), None).await;
    }

    /// AwaitingName -> Active. Returns false if the peer left before naming itself.
    async fn await_name(&mut self) -> io::Result<bool> {
        let Some(name) = self.next_text().await? else {
            return Ok(false);
        };

        let announcement = join_announcement(&name);
        self.handle.set_name(name);
        self.state = SessionState::Active;

        info!("{}", announcement);
        self.registry
            .broadcast(&encode(&announcement), Some(self.handle.id()))
            .await;

        Ok(true)
    }

    /// Active -> Active
    async fn relay(&self, text: &str) {
        let line = chat_line(self.handle.name().unwrap_or_default(), text);
        info!("{}", line);
        self.registry
            .broadcast(&encode(&line), Some(self.handle.id()))
            .await;
    }

    /// Reads and decodes the next line, or `None` at end of stream
    ///
    /// Bytes that are not valid UTF-8 become U+FFFD instead of failing the
    /// read.
    async fn next_text(&mut self) -> io::Result<Option<String>> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };

        let mut buf = Vec::new();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(None);
        }

        let line = String::from_utf8_lossy(&buf);
        let line = line.strip_suffix('\n').unwrap_or(&*line);
        let line = line.strip_suffix('\r').unwrap_or(line);
        Ok(Some(decode(line)))
    }

    /// Terminal transition into `Closed`
    async fn close(&mut self) {
        // Drops the read half; the write half shuts down once the outbound
        // queue has no senders left.
        self.reader = None;

        if let Some(name) = self.handle.name() {
            let announcement = leave_announcement(name);
            info!("{}", announcement);
            self.registry
                .broadcast(&encode(&announcement), Some(self.handle.id()))
                .await;
        } else {
            info!(
                "Connection {} from {} closed before naming itself",
                self.handle.id(),
                self.handle.addr()
            );
        }

        self.registry.deregister(self.handle.id()).await;
        self.state = SessionState::Closed;
    }
}
