//! # Errores Fatales del Servidor
//! src/error.rs
//!
//! Solo los errores de arranque llegan hasta `main`. Los errores de una
//! conexión se resuelven dentro del handler y nunca se propagan.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type ServerResult<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to open audit log {}: {source}", .path.display())]
    AuditLog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to start worker pool: {0}")]
    WorkerSpawn(#[source] io::Error),

    #[error("failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}
