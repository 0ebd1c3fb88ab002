//! # Módulo HTTP
//! src/http/mod.rs
//!
//! Subconjunto mínimo de HTTP/1.1 que necesita el servidor de archivos:
//!
//! - Parsing de la request line (método, target, versión)
//! - Construcción de responses con `Connection: close`
//! - Códigos de estado y tablas de reason phrases
//!
//! No hay keep-alive, chunked transfer ni pipelining: cada conexión lleva
//! exactamente un request y una respuesta.

pub mod request;   // Parsing de la request line
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::{ReasonPhrases, StatusCode};
