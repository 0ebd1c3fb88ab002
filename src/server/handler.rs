//! # Handler de Requests
//! src/server/handler.rs
//!
//! Máquina de estados de una conexión, estrictamente secuencial:
//!
//! ```text
//! Read → Parse → Validate Method → Validate Path → Resolve → Respond → Close
//!   │       │            │                │            │
//!   └─(0 bytes / error)──┴──── 400 / 405 ─┴── 404/500 ─┴──────────────→ Close
//! ```
//!
//! Ningún error de una conexión sale de aquí: el resultado es siempre un
//! [`Outcome`].

use super::connection::Connection;
use crate::audit::{AuditEvent, AuditLog};
use crate::config::{Config, MAX_REQUEST_BYTES_LIMIT};
use crate::content::{self, Resolution, ResolvedTarget};
use crate::http::{Method, ReasonPhrases, Request, Response, StatusCode};
use crate::metrics::MetricsCollector;
use std::fs::File;
use std::io::{Read, Write};
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Lo que necesita un worker para atender conexiones
#[derive(Clone)]
pub struct HandlerContext {
    pub root: PathBuf,
    pub max_request_bytes: usize,
    pub reason_phrases: ReasonPhrases,
    pub read_timeout: Option<Duration>,
    pub audit: AuditLog,
    pub metrics: MetricsCollector,
}

impl HandlerContext {
    pub fn from_config(config: &Config, audit: AuditLog, metrics: MetricsCollector) -> Self {
        Self {
            root: config.root_dir.clone(),
            max_request_bytes: config.max_request_bytes,
            reason_phrases: config.reason_phrases,
            read_timeout: config.read_timeout(),
            audit,
            metrics,
        }
    }
}

/// Cómo terminó una conexión
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Se cerró sin enviar nada (peer desconectado o error de lectura)
    Closed,

    /// Se envió (o se intentó enviar) una respuesta con este código
    Responded(StatusCode),
}

/// Atiende una conexión y la cierra
///
/// La conexión se consume: al retornar, el socket ya fue liberado.
pub fn handle_connection(conn: Connection, ctx: &HandlerContext) -> Outcome {
    if let Err(e) = conn.set_timeout(ctx.read_timeout) {
        tracing::debug!(peer = %conn.peer(), error = %e, "No se pudo aplicar el timeout");
    }

    let (mut stream, peer) = conn.into_parts();
    let outcome = serve(&mut stream, peer.ip(), ctx);

    tracing::debug!(peer = %peer, ?outcome, "Conexión cerrada");
    outcome
    // `stream` se suelta aquí: Close
}

/// Ejecuta la máquina de estados sobre cualquier stream
pub fn serve<S: Read + Write>(stream: &mut S, peer: IpAddr, ctx: &HandlerContext) -> Outcome {
    // Read
    // El tope aplica también a contextos armados sin `validate`
    let mut buffer = vec![0u8; ctx.max_request_bytes.min(MAX_REQUEST_BYTES_LIMIT)];
    let bytes_read = match stream.read(&mut buffer) {
        Ok(0) => {
            ctx.metrics.record_silent_close();
            return Outcome::Closed;
        }
        Ok(n) => n,
        Err(e) => {
            tracing::debug!(%peer, error = %e, "Error leyendo el request");
            ctx.metrics.record_silent_close();
            return Outcome::Closed;
        }
    };

    let (response, event) = respond(&buffer[..bytes_read], ctx);
    let status = response.status();

    // Respond
    let bytes = response.to_bytes(ctx.reason_phrases);
    if let Err(e) = stream.write_all(&bytes).and_then(|_| stream.flush()) {
        tracing::debug!(%peer, error = %e, "Error enviando la respuesta");
    }

    ctx.audit.record(peer, &event);
    ctx.metrics.record_response(status.as_u16(), response.body().len());
    tracing::debug!(%peer, status = status.as_u16(), "{}", event);

    Outcome::Responded(status)
}

/// Parse → Validate → Resolve, sin I/O de red
pub fn respond(raw: &[u8], ctx: &HandlerContext) -> (Response, AuditEvent) {
    // Parse
    let request = match Request::parse(raw) {
        Ok(request) => request,
        Err(e) => {
            return (
                Response::error(StatusCode::BadRequest),
                AuditEvent::Malformed(e.to_string()),
            )
        }
    };

    // Validate Method
    if let Method::Other(method) = request.method() {
        return (
            Response::error(StatusCode::MethodNotAllowed),
            AuditEvent::UnsupportedMethod(method.clone()),
        );
    }

    // Validate Path + Resolve
    match content::resolve(&ctx.root, request.target()) {
        Resolution::Traversal => (
            Response::error(StatusCode::BadRequest),
            AuditEvent::TraversalAttempt(request.target().to_string()),
        ),
        Resolution::File(file) => read_file(file),
    }
}

fn read_file(file: ResolvedTarget) -> (Response, AuditEvent) {
    if !file.path.exists() {
        return (
            Response::error(StatusCode::NotFound),
            AuditEvent::NotFound(file.target),
        );
    }

    let contents = File::open(&file.path).and_then(|mut f| {
        let mut contents = Vec::new();
        f.read_to_end(&mut contents)?;
        Ok(contents)
    });

    match contents {
        Ok(body) => (
            Response::new(StatusCode::Ok, file.content_type, body),
            AuditEvent::Served(file.target),
        ),
        Err(e) => {
            tracing::debug!(path = %file.path.display(), error = %e, "No se pudo leer el archivo");
            (
                Response::error(StatusCode::InternalServerError),
                AuditEvent::OpenFailed(file.target),
            )
        }
    }
}
