//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor de archivos con soporte para argumentos CLI y
//! variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./static_server --port 8080 \
//!   --root ./static \
//!   --workers 4 \
//!   --reason-phrases strict \
//!   --read-timeout-ms 5000
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=9000 ROOT_DIR=/srv/www ./static_server
//! ```

use crate::http::ReasonPhrases;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Niveles aceptados por `--log-level`
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Tope del buffer de lectura por request (1 MiB)
pub const MAX_REQUEST_BYTES_LIMIT: usize = 1024 * 1024;

/// Configuración del servidor de archivos estáticos
#[derive(Debug, Clone, Parser)]
#[command(name = "static_server")]
#[command(about = "Servidor HTTP concurrente de archivos estáticos")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha (todas las interfaces por defecto)
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio raíz desde el que se sirven los archivos
    #[arg(long = "root", default_value = "./static", env = "ROOT_DIR")]
    pub root_dir: PathBuf,

    // === Workers y cola ===

    /// Número de workers del pool
    #[arg(short, long, default_value = "4", env = "WORKERS")]
    pub workers: usize,

    /// Capacidad máxima de la cola de conexiones (0 = sin límite)
    #[arg(long = "queue-capacity", default_value = "0", env = "QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    // === Requests ===

    /// Máximo de bytes leídos por request
    #[arg(long = "max-request-bytes", default_value = "2048", env = "MAX_REQUEST_BYTES")]
    pub max_request_bytes: usize,

    /// Tabla de reason phrases: compat (200/404/resto) o strict (RFC)
    #[arg(long = "reason-phrases", value_enum, default_value = "compat", env = "REASON_PHRASES")]
    pub reason_phrases: ReasonPhrases,

    /// Timeout de lectura/escritura por conexión en milisegundos (sin timeout si se omite)
    #[arg(long = "read-timeout-ms", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: Option<u64>,

    // === Logs ===

    /// Archivo append-only del log de auditoría
    #[arg(long = "log-file", default_value = "server.log", env = "LOG_FILE")]
    pub log_file: PathBuf,

    /// Nivel del log de diagnóstico (trace, debug, info, warn, error)
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use static_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Timeout por conexión, si está habilitado
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }

    /// Capacidad de la cola; `None` = sin límite
    pub fn queue_capacity(&self) -> Option<usize> {
        match self.queue_capacity {
            0 => None,
            n => Some(n),
        }
    }

    /// Nivel de `tracing` correspondiente a `log_level`
    pub fn tracing_level(&self) -> tracing::Level {
        match self.log_level.to_ascii_lowercase().as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => tracing::Level::INFO,
        }
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("Workers must be >= 1".to_string());
        }

        if self.max_request_bytes == 0 {
            return Err("Max request bytes must be >= 1".to_string());
        }

        if self.max_request_bytes > MAX_REQUEST_BYTES_LIMIT {
            return Err(format!(
                "Max request bytes must be <= {}",
                MAX_REQUEST_BYTES_LIMIT
            ));
        }

        if self.read_timeout_ms == Some(0) {
            return Err("Read timeout must be > 0 when set".to_string());
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(format!("Unknown log level: {}", self.log_level));
        }

        Ok(())
    }

    /// Reporta un resumen de la configuración
    pub fn print_summary(&self) {
        tracing::info!("🌐 Dirección:      {}", self.address());
        tracing::info!("📁 Raíz:           {}", self.root_dir.display());
        tracing::info!("👷 Workers:        {}", self.workers);

        match self.queue_capacity() {
            Some(capacity) => tracing::info!("📥 Cola:           {} conexiones", capacity),
            None => tracing::info!("📥 Cola:           sin límite"),
        }

        tracing::info!("📏 Request máx:    {} bytes", self.max_request_bytes);
        tracing::info!("🏷️  Reason phrases: {:?}", self.reason_phrases);

        match self.read_timeout_ms {
            Some(ms) => tracing::info!("⏱️  Timeout:        {} ms", ms),
            None => tracing::info!("⏱️  Timeout:        deshabilitado"),
        }

        tracing::info!("📝 Log auditoría:  {}", self.log_file.display());
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            root_dir: PathBuf::from("./static"),
            workers: 4,
            queue_capacity: 0,
            max_request_bytes: 2048,
            reason_phrases: ReasonPhrases::Compat,
            read_timeout_ms: None,
            log_file: PathBuf::from("server.log"),
            log_level: "info".to_string(),
        }
    }
}
