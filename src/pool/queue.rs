//! # Cola de Tareas
//! src/pool/queue.rs
//!
//! Cola FIFO thread-safe entre el accept loop (productor) y los workers
//! (consumidores).
//!
//! La cola y el flag `running` viven bajo el mismo `Mutex`: un worker evalúa
//! "hay trabajo" y "el servidor sigue corriendo" en un solo paso, así que no
//! puede dormirse después de un `enqueue` tardío ni después del shutdown.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard};

/// Estado protegido por el lock de la cola
struct QueueState<T> {
    items: VecDeque<T>,

    /// `true` desde la creación hasta `shutdown()`; nunca vuelve a `true`
    running: bool,
}

/// Error de `enqueue` después del shutdown; devuelve el item al llamador
pub struct QueueClosed<T>(pub T);

impl<T> QueueClosed<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for QueueClosed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("QueueClosed(..)")
    }
}

impl<T> fmt::Display for QueueClosed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("task queue is shut down")
    }
}

impl<T> std::error::Error for QueueClosed<T> {}

/// Cola FIFO con capacidad opcional
pub struct TaskQueue<T> {
    state: Mutex<QueueState<T>>,

    /// Notifica a los workers que hay trabajo o que hubo shutdown
    not_empty: Condvar,

    /// Notifica al productor que se liberó espacio (solo cola acotada)
    not_full: Condvar,

    /// `None` = sin límite
    capacity: Option<usize>,
}

impl<T> TaskQueue<T> {
    /// Cola sin límite de capacidad
    pub fn unbounded() -> Self {
        Self::with_capacity(None)
    }

    /// Cola acotada; `enqueue` bloquea mientras esté llena
    pub fn bounded(capacity: usize) -> Self {
        Self::with_capacity(Some(capacity.max(1)))
    }

    /// `Some(0)` se trata como sin límite
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                running: true,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity: capacity.filter(|&c| c > 0),
        }
    }

    // Un panic dentro de un job nunca ocurre con el lock tomado, así que el
    // estado sigue siendo consistente aunque el mutex quede envenenado.
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_full(&self, state: &QueueState<T>) -> bool {
        self.capacity.is_some_and(|cap| state.items.len() >= cap)
    }

    /// Encola al final y despierta a un worker
    ///
    /// Si la cola está llena, espera a que un worker libere espacio. Después
    /// del shutdown el item se devuelve dentro de `QueueClosed`.
    pub fn enqueue(&self, item: T) -> Result<(), QueueClosed<T>> {
        let mut state = self.lock();

        loop {
            if !state.running {
                return Err(QueueClosed(item));
            }
            if !self.is_full(&state) {
                break;
            }
            state = self
                .not_full
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }

        state.items.push_back(item);
        self.not_empty.notify_one();

        Ok(())
    }

    /// Desencola la cabeza, esperando si hace falta
    ///
    /// Retorna `None` solo cuando hubo shutdown y la cola está vacía: mientras
    /// quede trabajo pendiente, se sigue entregando (drain).
    pub fn dequeue_or_wait(&self) -> Option<T> {
        let mut state = self.lock();

        loop {
            if let Some(item) = state.items.pop_front() {
                self.not_full.notify_one();
                return Some(item);
            }

            if !state.running {
                return None;
            }

            // Despertares espurios: se re-evalúa el predicado al volver
            state = self
                .not_empty
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    /// Marca el shutdown y despierta a todos los que esperan
    ///
    /// Lock, mutación y broadcast ocurren bajo el mismo guard. Llamarlo más
    /// de una vez no tiene efecto adicional.
    pub fn shutdown(&self) {
        let mut state = self.lock();
        state.running = false;
        self.not_empty.notify_all();
        self.not_full.notify_all();
    }

    /// `false` después de `shutdown()`
    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    /// Retorna el tamaño actual de la cola
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Verifica si la cola está vacía
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}
