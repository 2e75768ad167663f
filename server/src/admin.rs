//! Operator console: every line typed at the server is broadcast to all clients

use crate::registry::ConnectionRegistry;
use log::{error, info};
use shared::{admin_line, encode};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Reads operator lines from `input` and broadcasts each one, unexcluded,
/// as `Administrator: <line>`.
///
/// Returns when `input` reaches end of stream or fails to read.
pub async fn run_admin_console<R>(registry: Arc<ConnectionRegistry>, input: R)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let message = admin_line(&line);
                let delivered = registry.broadcast(&encode(&message), None).await;
                info!("{} (sent to {} connections)", message, delivered);
            }
            Ok(None) => {
                info!("Admin console closed");
                break;
            }
            Err(e) => {
                error!("Failed to read admin input: {}", e);
                break;
            }
        }
    }
}
