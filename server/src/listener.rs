//! Server network layer: TCP accept loop and per-connection writer tasks

use crate::error::{ServerError, ServerResult};
use crate::registry::{ConnectionHandle, ConnectionRegistry, OutboundReceiver};
use crate::session::Session;
use log::{debug, error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// Accepts chat connections and runs one session per connection
pub struct Server {
    listener: TcpListener,
    registry: Arc<ConnectionRegistry>,
}

impl Server {
    /// Binds the listening socket. A bind failure is fatal to the caller.
    pub async fn new(addr: &str) -> ServerResult<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(Server {
            listener,
            registry: Arc::new(ConnectionRegistry::new()),
        })
    }

    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Shared registry, for collaborators such as the admin console
    pub fn registry(&self) -> Arc<ConnectionRegistry> {
        Arc::clone(&self.registry)
    }

    /// Accept loop. Runs until the task is dropped; failed accepts are
    /// logged and retried.
    pub async fn run(&self) -> ServerResult<()> {
        info!("Server started successfully");

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => self.spawn_connection(stream, addr),
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
            }
        }
    }

    /// Spawns the writer and session tasks for one accepted connection
    fn spawn_connection(&self, stream: TcpStream, addr: SocketAddr) {
        let (read_half, write_half) = stream.into_split();
        let (handle, outbound) = ConnectionHandle::channel(self.registry.next_id(), addr);
        let id = handle.id();

        info!("Accepted connection {} from {}", id, addr);

        tokio::spawn(async move {
            if let Err(e) = pump_outbound(outbound, write_half).await {
                error!("Failed to write to connection {}: {}", id, e);
            }
            debug!("Writer for connection {} stopped", id);
        });

        let session = Session::new(self.registry(), handle, BufReader::new(read_half));
        tokio::spawn(session.run());
    }
}

/// Writes queued wire lines to the peer until every sender is gone
///
/// Each line gets a trailing newline and is flushed on its own. The writer
/// is shut down afterwards so the peer sees end of stream.
pub async fn pump_outbound<W>(
    mut outbound: OutboundReceiver,
    mut writer: W,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = outbound.recv().await {
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    writer.shutdown().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{decode, encode, NAME_PROMPT};
    use tokio::io::AsyncBufReadExt;
    use tokio::time::timeout;

    fn test_addr() -> SocketAddr {
        "127.0.0.1:8080".parse().unwrap()
    }

    #[tokio::test]
    async fn test_pump_outbound_writes_lines() {
        let registry = ConnectionRegistry::new();
        let (handle, outbound) = ConnectionHandle::channel(registry.next_id(), test_addr());
        let writer = tokio_test::io::Builder::new()
            .write(b"first")
            .write(b"\n")
            .write(b"second")
            .write(b"\n")
            .build();

        handle.send("first".to_string()).unwrap();
        handle.send("second".to_string()).unwrap();
        drop(handle);

        pump_outbound(outbound, writer).await.unwrap();
    }

    #[tokio::test]
    async fn test_pump_outbound_stops_on_write_error() {
        let registry = ConnectionRegistry::new();
        let (handle, outbound) = ConnectionHandle::channel(registry.next_id(), test_addr());
        let writer = tokio_test::io::Builder::new()
            .write_error(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
            .build();

        handle.send("lost".to_string()).unwrap();

        let result = pump_outbound(outbound, writer).await;
        assert!(result.is_err());
        // Receiver dropped with the writer task; later pushes fail
        assert!(handle.send("after".to_string()).is_err());
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let first = Server::new("127.0.0.1:0").await.unwrap();
        let taken = first.local_addr().unwrap().to_string();

        match Server::new(&taken).await {
            Err(ServerError::Bind { addr, .. }) => assert_eq!(addr, taken),
            Err(e) => panic!("Unexpected error: {}", e),
            Ok(_) => panic!("Second bind on {} should fail", taken),
        }
    }

    #[tokio::test]
    async fn test_accepted_connection_is_prompted_and_registered() {
        let server = Server::new("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap();
        let registry = server.registry();
        tokio::spawn(async move { server.run().await });

        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();

        let prompt = timeout(Duration::from_secs(2), lines.next_line())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(decode(&prompt), NAME_PROMPT);
        assert_eq!(registry.len().await, 1);

        write_half
            .write_all(format!("{}\n", encode("Bob")).as_bytes())
            .await
            .unwrap();
        drop(write_half);

        // Server closes its side once the session is torn down
        let end = timeout(Duration::from_secs(2), lines.next_line())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(end, None);
        assert!(registry.is_empty().await);
    }
}
