//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! El accept loop acepta conexiones y las encola; un pool fijo de workers
//! las atiende. Al pedir el shutdown el loop deja de aceptar, la cola se
//! cierra y se espera a que los workers drenen todo lo pendiente.

use super::connection::Connection;
use super::handler::{self, HandlerContext};
use crate::audit::{AuditLog, FileSink, LogSink};
use crate::config::Config;
use crate::error::{ServerError, ServerResult};
use crate::metrics::{MetricsCollector, MetricsSnapshot};
use crate::pool::{TaskQueue, WorkerPool};
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Pausa del accept loop cuando no hay conexiones pendientes
pub const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Permite pedir el shutdown desde otro thread (o desde un signal handler)
#[derive(Clone, Default)]
pub struct ShutdownHandle {
    requested: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pide el shutdown; el accept loop lo ve en su siguiente vuelta
    pub fn trigger(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Servidor de archivos estáticos con pool de workers
pub struct Server {
    config: Config,
    listener: TcpListener,
    local_addr: SocketAddr,
    audit: AuditLog,
    metrics: MetricsCollector,
    shutdown: ShutdownHandle,
}

impl Server {
    /// Valida la configuración, abre el log de auditoría y hace bind
    pub fn bind(config: Config) -> ServerResult<Self> {
        // Una configuración inválida no debe dejar un log creado
        config.validate().map_err(ServerError::InvalidConfig)?;

        let sink = FileSink::open(&config.log_file).map_err(|source| ServerError::AuditLog {
            path: config.log_file.clone(),
            source,
        })?;

        Self::bind_with_sink(config, Arc::new(sink))
    }

    /// Igual que [`Server::bind`] pero con un sink de auditoría arbitrario
    pub fn bind_with_sink(config: Config, sink: Arc<dyn LogSink>) -> ServerResult<Self> {
        config.validate().map_err(ServerError::InvalidConfig)?;

        if !config.root_dir.is_dir() {
            tracing::warn!(
                root = %config.root_dir.display(),
                "El directorio raíz no existe; todos los requests darán 404"
            );
        }

        let address = config.address();
        let listener = TcpListener::bind(&address).map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;
        let local_addr = listener.local_addr()?;

        // Accept no bloqueante: el loop puede observar el shutdown sin
        // necesitar una conexión que lo despierte
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            listener,
            local_addr,
            audit: AuditLog::new(sink),
            metrics: MetricsCollector::new(),
            shutdown: ShutdownHandle::new(),
        })
    }

    /// Dirección real del listener (útil con puerto 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    pub fn metrics(&self) -> MetricsCollector {
        self.metrics.clone()
    }

    /// Corre el accept loop hasta que se pida el shutdown
    ///
    /// Retorna las métricas finales después de que todos los workers
    /// terminaron.
    pub fn run(self) -> ServerResult<MetricsSnapshot> {
        let Server {
            config,
            listener,
            local_addr,
            audit,
            metrics,
            shutdown,
        } = self;

        let queue = Arc::new(TaskQueue::with_capacity(config.queue_capacity()));
        let ctx = HandlerContext::from_config(&config, audit, metrics.clone());

        let pool = WorkerPool::spawn(config.workers, Arc::clone(&queue), move |conn: Connection| {
            handler::handle_connection(conn, &ctx);
        })
        .map_err(ServerError::WorkerSpawn)?;

        tracing::info!(
            "[+] Servidor escuchando en {} con {} workers",
            local_addr,
            pool.size()
        );

        while !shutdown.is_requested() {
            match listener.accept() {
                Ok((stream, peer)) => {
                    if !Self::dispatch(stream, peer, &queue, &metrics) {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => Self::pause_after_accept_error(&e),
            }
        }

        // Los clientes que ya completaron el handshake se atienden igual
        loop {
            match listener.accept() {
                Ok((stream, peer)) => {
                    if !Self::dispatch(stream, peer, &queue, &metrics) {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    tracing::warn!(error = %e, "Error al aceptar conexión");
                    break;
                }
            }
        }
        drop(listener);

        tracing::info!("[*] Shutdown: drenando {} conexiones pendientes", queue.len());
        let report = pool.shutdown();
        tracing::info!(
            processed = report.total_processed(),
            failed_joins = report.failed_joins,
            "[*] Workers terminados"
        );

        tracing::info!("Métricas finales: {}", metrics.get_metrics_json());

        Ok(metrics.snapshot())
    }

    /// Reporta un accept fallido y espera antes de reintentar
    ///
    /// Errores como EMFILE persisten mientras no se libere un descriptor, así
    /// que reintentar de inmediato solo gira en vacío.
    fn pause_after_accept_error(e: &io::Error) {
        tracing::warn!(error = %e, "Error al aceptar conexión");
        thread::sleep(ACCEPT_POLL_INTERVAL);
    }

    /// Encola una conexión aceptada; `false` si la cola ya está cerrada
    fn dispatch(
        stream: TcpStream,
        peer: SocketAddr,
        queue: &TaskQueue<Connection>,
        metrics: &MetricsCollector,
    ) -> bool {
        // En algunas plataformas el socket hereda el modo no bloqueante
        if let Err(e) = stream.set_nonblocking(false) {
            tracing::warn!(%peer, error = %e, "No se pudo configurar la conexión; se descarta");
            return true;
        }

        metrics.record_accepted();
        tracing::debug!(%peer, pending = queue.len(), "Nueva conexión");

        match queue.enqueue(Connection::new(stream, peer)) {
            Ok(()) => true,
            Err(closed) => {
                // Solo ocurre si la cola se cerró por fuera del accept loop
                drop(closed.into_inner());
                false
            }
        }
    }
}
