//! # Log de Auditoría
//! src/audit.rs
//!
//! Una línea por request atendido, en un archivo append-only:
//!
//! ```text
//! 2024-05-01 13:45:10 [127.0.0.1] Served: /index.html
//! 2024-05-01 13:45:11 [10.0.0.7] Directory traversal attempt: /../etc/passwd
//! ```
//!
//! El sink tiene su propio lock, independiente de la cola de tareas. Cada
//! línea se escribe completa bajo ese lock, así que nunca se intercalan.

use chrono::Local;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::net::IpAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Formato del timestamp de cada línea
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Destino append-only de las líneas de auditoría
pub trait LogSink: Send + Sync {
    /// Agrega una línea completa (sin el salto de línea final)
    fn append(&self, line: &str) -> io::Result<()>;
}

/// Sink respaldado por un archivo abierto en modo append
pub struct FileSink {
    file: Mutex<File>,
}

impl FileSink {
    /// Abre (o crea) el archivo de log
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl LogSink for FileSink {
    fn append(&self, line: &str) -> io::Result<()> {
        let mut record = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');

        let mut file = self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        file.write_all(record.as_bytes())?;
        file.flush()
    }
}

/// Sink en memoria, útil para inspeccionar qué se registró
#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copia de las líneas registradas hasta ahora
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl LogSink for MemorySink {
    fn append(&self, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.to_string());
        Ok(())
    }
}

/// Resultado de un request, tal como se describe en el log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    Served(String),
    NotFound(String),
    UnsupportedMethod(String),
    TraversalAttempt(String),
    OpenFailed(String),
    Malformed(String),
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditEvent::Served(target) => write!(f, "Served: {}", target),
            AuditEvent::NotFound(target) => write!(f, "File not found: {}", target),
            AuditEvent::UnsupportedMethod(method) => write!(f, "Unsupported method: {}", method),
            AuditEvent::TraversalAttempt(target) => {
                write!(f, "Directory traversal attempt: {}", target)
            }
            AuditEvent::OpenFailed(target) => write!(f, "Failed to open file: {}", target),
            AuditEvent::Malformed(reason) => write!(f, "Malformed request: {}", reason),
        }
    }
}

/// Arma una línea `<timestamp> [<ip>] <evento>`
pub fn format_line(timestamp: &str, peer: IpAddr, event: &AuditEvent) -> String {
    format!("{} [{}] {}", timestamp, peer, event)
}

/// Timestamp local actual con [`TIMESTAMP_FORMAT`]
pub fn current_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Handle compartido hacia el sink de auditoría
#[derive(Clone)]
pub struct AuditLog {
    sink: Arc<dyn LogSink>,
}

impl AuditLog {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Registra un evento; un fallo de escritura se reporta pero no se propaga
    pub fn record(&self, peer: IpAddr, event: &AuditEvent) {
        let line = format_line(&current_timestamp(), peer, event);

        if let Err(e) = self.sink.append(&line) {
            tracing::warn!(error = %e, "No se pudo escribir en el log de auditoría");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use std::net::Ipv4Addr;
    use std::thread;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    #[test]
    fn test_event_descriptions() {
        assert_eq!(AuditEvent::Served("/a.html".into()).to_string(), "Served: /a.html");
        assert_eq!(AuditEvent::NotFound("/x".into()).to_string(), "File not found: /x");
        assert_eq!(
            AuditEvent::UnsupportedMethod("POST".into()).to_string(),
            "Unsupported method: POST"
        );
        assert_eq!(
            AuditEvent::TraversalAttempt("/../x".into()).to_string(),
            "Directory traversal attempt: /../x"
        );
        assert_eq!(AuditEvent::OpenFailed("/d".into()).to_string(), "Failed to open file: /d");
    }

    #[test]
    fn test_format_line() {
        let line = format_line(
            "2024-05-01 13:45:10",
            LOCALHOST,
            &AuditEvent::Served("/index.html".into()),
        );
        assert_eq!(line, "2024-05-01 13:45:10 [127.0.0.1] Served: /index.html");
    }

    #[test]
    fn test_timestamp_format() {
        let timestamp = current_timestamp();
        assert_eq!(timestamp.len(), 19);
        assert!(NaiveDateTime::parse_from_str(&timestamp, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_record_into_memory_sink() {
        let sink = Arc::new(MemorySink::new());
        let audit = AuditLog::new(sink.clone());

        audit.record(LOCALHOST, &AuditEvent::NotFound("/missing".into()));

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(" [127.0.0.1] File not found: /missing"));
    }

    #[test]
    fn test_file_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.log");

        {
            let sink = FileSink::open(&path).unwrap();
            sink.append("first").unwrap();
        }
        {
            let sink = FileSink::open(&path).unwrap();
            sink.append("second").unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_file_sink_concurrent_lines_not_interleaved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.log");
        let sink = Arc::new(FileSink::open(&path).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for i in 0..50 {
                        sink.append(&format!("thread-{} line-{} {}", t, i, "x".repeat(200)))
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 8 * 50);
        for line in lines {
            assert!(line.starts_with("thread-"));
            assert!(line.ends_with(&"x".repeat(200)));
        }
    }
}
