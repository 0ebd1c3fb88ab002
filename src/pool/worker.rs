//! # Pool de Workers
//! src/pool/worker.rs
//!
//! N threads de larga vida que repiten: desencolar (o terminar) y procesar.
//! Un worker termina solo cuando hubo shutdown **y** la cola está vacía.

use super::queue::TaskQueue;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Un thread del pool
struct Worker {
    id: usize,
    handle: JoinHandle<usize>,
}

/// Resumen del pool después de `shutdown`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolReport {
    /// Items procesados por cada worker, indexado por id
    pub processed: Vec<usize>,

    /// Workers que no se pudieron unir
    pub failed_joins: usize,
}

impl PoolReport {
    pub fn total_processed(&self) -> usize {
        self.processed.iter().sum()
    }
}

/// Pool de tamaño fijo que consume de una `TaskQueue` compartida
pub struct WorkerPool<T: Send + 'static> {
    queue: Arc<TaskQueue<T>>,
    workers: Vec<Worker>,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Inicia `size` workers que ejecutan `job` por cada item
    ///
    /// Si no se puede crear algún thread, se hace shutdown de los ya creados
    /// y se retorna el error.
    pub fn spawn<F>(size: usize, queue: Arc<TaskQueue<T>>, job: F) -> io::Result<Self>
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        let job = Arc::new(job);
        let mut pool = Self {
            queue: Arc::clone(&queue),
            workers: Vec::with_capacity(size),
        };

        for id in 0..size {
            let queue = Arc::clone(&queue);
            let job = Arc::clone(&job);

            let spawned = thread::Builder::new()
                .name(format!("worker-{}", id))
                .spawn(move || Self::worker_loop(id, queue, job));

            match spawned {
                Ok(handle) => pool.workers.push(Worker { id, handle }),
                Err(e) => {
                    pool.stop();
                    return Err(e);
                }
            }
        }

        Ok(pool)
    }

    /// Loop principal del worker
    fn worker_loop<F>(id: usize, queue: Arc<TaskQueue<T>>, job: Arc<F>) -> usize
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        tracing::debug!(worker = id, "Worker iniciado");
        let mut processed = 0;

        while let Some(item) = queue.dequeue_or_wait() {
            // Un panic en un item no se lleva al worker consigo
            if panic::catch_unwind(AssertUnwindSafe(|| (*job)(item))).is_err() {
                tracing::error!(worker = id, "Panic procesando una tarea; el worker continúa");
            }
            processed += 1;
        }

        tracing::debug!(worker = id, processed, "Worker terminado");
        processed
    }

    /// Número de workers vivos
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Pide el shutdown de la cola y espera a que todos los workers drenen
    pub fn shutdown(mut self) -> PoolReport {
        self.stop()
    }

    fn stop(&mut self) -> PoolReport {
        self.queue.shutdown();

        let mut report = PoolReport::default();
        for worker in self.workers.drain(..) {
            match worker.handle.join() {
                Ok(processed) => report.processed.push(processed),
                Err(_) => {
                    tracing::error!(worker = worker.id, "No se pudo unir el worker");
                    report.processed.push(0);
                    report.failed_joins += 1;
                }
            }
        }
        report
    }
}

impl<T: Send + 'static> Drop for WorkerPool<T> {
    fn drop(&mut self) {
        if !self.workers.is_empty() {
            self.stop();
        }
    }
}
