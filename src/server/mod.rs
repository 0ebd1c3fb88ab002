//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones y las encola
//! 3. Atiende cada conexión en un worker del pool
//! 4. Se apaga drenando la cola

pub mod connection;
pub mod handler;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use connection::Connection;
pub use handler::{HandlerContext, Outcome};
pub use tcp::{Server, ShutdownHandle};
