//! Error types for the relay server

use thiserror::Error;

/// Errors that end the server process
///
/// Per-connection failures never show up here; a session logs them and
/// tears itself down instead.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_bind_error_message() {
        let err = ServerError::Bind {
            addr: "0.0.0.0:54321".to_string(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        };

        let message = err.to_string();
        assert!(message.contains("0.0.0.0:54321"));
        assert!(message.contains("address in use"));
    }

    #[test]
    fn test_io_error_conversion() {
        let err: ServerError = io::Error::new(io::ErrorKind::Other, "boom").into();
        assert!(matches!(err, ServerError::Io(_)));
        assert_eq!(err.to_string(), "boom");
    }
}
