//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! Toda respuesta lleva el mismo bloque de headers, en este orden:
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 13\r\n
//! Connection: close\r\n
//! \r\n
//! <h1>hola</h1>
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use static_server::http::{ReasonPhrases, Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok, "text/css", b"body{}".to_vec());
//! let bytes = response.to_bytes(ReasonPhrases::Compat);
//! assert!(bytes.starts_with(b"HTTP/1.1 200 OK\r\n"));
//! ```

use super::{ReasonPhrases, StatusCode};

/// Respuesta HTTP lista para serializar
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,

    content_type: String,

    /// Cuerpo binario; `Content-Length` se deriva de su longitud en bytes
    body: Vec<u8>,
}

impl Response {
    /// Crea una respuesta con cuerpo arbitrario
    pub fn new(status: StatusCode, content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type: content_type.to_string(),
            body,
        }
    }

    /// Respuesta de error con el cuerpo text/plain canónico del código
    ///
    /// # Ejemplo
    /// ```
    /// use static_server::http::{Response, StatusCode};
    ///
    /// let response = Response::error(StatusCode::NotFound);
    /// assert_eq!(response.body(), b"404 Not Found");
    /// ```
    pub fn error(status: StatusCode) -> Self {
        Self::new(status, "text/plain", status.error_body().as_bytes().to_vec())
    }

    /// Headers en el orden en que se envían
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Content-Type", self.content_type.clone()),
            ("Content-Length", self.body.len().to_string()),
            ("Connection", "close".to_string()),
        ]
    }

    /// Serializa status line, headers, línea vacía y body
    pub fn to_bytes(&self, phrases: ReasonPhrases) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.1 {} {}\r\n",
            self.status.as_u16(),
            self.status.reason_for(phrases)
        );

        for (name, value) in self.headers() {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(&value);
            head.push_str("\r\n");
        }
        head.push_str("\r\n");

        let mut result = Vec::with_capacity(head.len() + self.body.len());
        result.extend_from_slice(head.as_bytes());
        result.extend_from_slice(&self.body);
        result
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
