//! # Códigos de Estado HTTP
//! src/http/status.rs
//!
//! Códigos de estado que puede emitir el servidor de archivos y las dos
//! tablas de reason phrases que soporta:
//!
//! - **Compat**: `OK` (200), `Not Found` (404) e `Internal Server Error`
//!   para cualquier otro código, incluidos 400 y 405.
//! - **Strict**: las frases del RFC para cada código.

use clap::ValueEnum;

/// Representa los códigos de estado HTTP que soporta nuestro servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// 200 OK - Archivo servido
    Ok = 200,

    /// 400 Bad Request - Request malformado o intento de traversal
    BadRequest = 400,

    /// 404 Not Found - El archivo no existe bajo la raíz
    NotFound = 404,

    /// 405 Method Not Allowed - Cualquier método distinto de GET
    MethodNotAllowed = 405,

    /// 500 Internal Server Error - El archivo existe pero no se pudo leer
    InternalServerError = 500,
}

/// Tabla de reason phrases usada al serializar la status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReasonPhrases {
    /// Solo distingue 200 y 404; todo lo demás es "Internal Server Error"
    #[default]
    Compat,

    /// Frases estándar del RFC
    Strict,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use static_server::http::StatusCode;
    /// assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Reason phrase estándar (RFC) del código
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }

    /// Reason phrase según la tabla elegida
    ///
    /// # Ejemplo
    /// ```
    /// use static_server::http::{ReasonPhrases, StatusCode};
    ///
    /// assert_eq!(StatusCode::BadRequest.reason_for(ReasonPhrases::Compat), "Internal Server Error");
    /// assert_eq!(StatusCode::BadRequest.reason_for(ReasonPhrases::Strict), "Bad Request");
    /// ```
    pub fn reason_for(&self, phrases: ReasonPhrases) -> &'static str {
        match phrases {
            ReasonPhrases::Strict => self.reason_phrase(),
            ReasonPhrases::Compat => match self {
                StatusCode::Ok => "OK",
                StatusCode::NotFound => "Not Found",
                _ => "Internal Server Error",
            },
        }
    }

    /// Cuerpo text/plain que acompaña a las respuestas de error
    pub fn error_body(&self) -> &'static str {
        match self {
            StatusCode::Ok => "",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "404 Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "405 Method Not Allowed"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
