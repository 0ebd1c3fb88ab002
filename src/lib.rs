//! # Static Server
//! src/lib.rs
//!
//! Servidor HTTP concurrente de archivos estáticos: un accept loop entrega
//! conexiones a un pool fijo de workers a través de una cola FIFO protegida
//! por un mutex y una condvar.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Request line, responses y códigos de estado
//! - `content`: Resolución de targets y Content-Type por extensión
//! - `audit`: Log de auditoría append-only
//! - `pool`: Cola de tareas y pool de workers
//! - `server`: Accept loop, handle de conexión y máquina de estados del request
//! - `metrics`: Contadores del servidor
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use static_server::config::Config;
//! use static_server::server::Server;
//!
//! let server = Server::bind(Config::default()).expect("Error al iniciar servidor");
//! server.run().expect("Error fatal");
//! ```

pub mod audit;
pub mod config;
pub mod content;
pub mod error;
pub mod http;
pub mod metrics;
pub mod pool;
pub mod server;

pub use error::{ServerError, ServerResult};
