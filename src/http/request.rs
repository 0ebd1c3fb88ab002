//! # Parsing de la Request Line
//! src/http/request.rs
//!
//! El servidor solo interpreta la primera línea del request:
//!
//! ```text
//! GET /index.html HTTP/1.1\r\n
//! Host: localhost:8080\r\n
//! \r\n
//! ```
//!
//! Los headers se leen junto con el resto del buffer pero no se interpretan.

use std::borrow::Cow;
use thiserror::Error;

/// Método HTTP del request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - el único método que se atiende
    GET,

    /// Cualquier otro token (se responde con 405)
    Other(String),
}

impl Method {
    fn from_token(token: &str) -> Self {
        match token {
            "GET" => Method::GET,
            other => Method::Other(other.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::Other(token) => token,
        }
    }
}

/// Request line parseada
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,

    /// Target tal como llegó (ej: "/css/site.css")
    target: String,

    /// Versión del protocolo; se tolera que falte
    version: Option<String>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Buffer vacío o solo espacios en la primera línea
    #[error("Empty request line")]
    EmptyRequest,

    /// Hay método pero no target
    #[error("Missing request target after method {0}")]
    MissingTarget(String),
}

impl Request {
    /// Parsea la primera línea de un buffer leído del socket
    ///
    /// Los tokens se separan por whitespace. Bytes que no son UTF-8 se
    /// reemplazan en vez de rechazar el request.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use static_server::http::{Method, Request};
    ///
    /// let request = Request::parse(b"GET /app.js HTTP/1.1\r\nHost: x\r\n\r\n").unwrap();
    /// assert_eq!(request.method(), &Method::GET);
    /// assert_eq!(request.target(), "/app.js");
    /// assert_eq!(request.version(), Some("HTTP/1.1"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        let first_line = match buffer.iter().position(|&b| b == b'\n') {
            Some(end) => &buffer[..end],
            None => buffer,
        };
        let line: Cow<'_, str> = String::from_utf8_lossy(first_line);

        let mut tokens = line.split_whitespace();

        let method = tokens
            .next()
            .map(Method::from_token)
            .ok_or(ParseError::EmptyRequest)?;

        let target = tokens
            .next()
            .ok_or_else(|| ParseError::MissingTarget(method.as_str().to_string()))?
            .to_string();

        let version = tokens.next().map(str::to_string);

        Ok(Request {
            method,
            target,
            version,
        })
    }

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Obtiene el target sin modificar
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Obtiene la versión HTTP, si vino
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_get() {
        let request = Request::parse(b"GET / HTTP/1.1\r\n\r\n").unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.target(), "/");
        assert_eq!(request.version(), Some("HTTP/1.1"));
    }

    #[test]
    fn test_parse_ignores_headers() {
        let raw = b"GET /index.html HTTP/1.1\r\nHost: localhost:8080\r\nUser-Agent: test\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.target(), "/index.html");
    }

    #[test]
    fn test_parse_other_method() {
        let request = Request::parse(b"POST /upload HTTP/1.1\r\n\r\n").unwrap();

        assert_eq!(request.method(), &Method::Other("POST".to_string()));
        assert_eq!(request.method().as_str(), "POST");
    }

    #[test]
    fn test_method_is_case_sensitive() {
        let request = Request::parse(b"get / HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.method(), &Method::Other("get".to_string()));
    }

    #[test]
    fn test_parse_without_version() {
        let request = Request::parse(b"GET /a.css\r\n\r\n").unwrap();

        assert_eq!(request.target(), "/a.css");
        assert_eq!(request.version(), None);
    }

    #[test]
    fn test_parse_bare_newline() {
        let request = Request::parse(b"GET /a.png HTTP/1.0\nHost: x\n\n").unwrap();
        assert_eq!(request.target(), "/a.png");
        assert_eq!(request.version(), Some("HTTP/1.0"));
    }

    #[test]
    fn test_empty_request() {
        assert_eq!(Request::parse(b""), Err(ParseError::EmptyRequest));
        assert_eq!(Request::parse(b"   \r\n\r\n"), Err(ParseError::EmptyRequest));
    }

    #[test]
    fn test_missing_target() {
        let result = Request::parse(b"GET\r\n\r\n");
        assert_eq!(result, Err(ParseError::MissingTarget("GET".to_string())));
    }

    #[test]
    fn test_invalid_utf8_does_not_fail() {
        let request = Request::parse(b"\xff\xfe /x HTTP/1.1\r\n").unwrap();
        assert!(matches!(request.method(), Method::Other(_)));
    }
}
