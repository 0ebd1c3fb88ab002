//! # Pool de Workers y Cola de Tareas
//! src/pool/mod.rs
//!
//! El accept loop produce conexiones y los workers las consumen:
//!
//! ```text
//! accept loop → TaskQueue → worker-0..N → handler
//! ```
//!
//! La cola se construye una sola vez y se comparte con `Arc`; no hay estado
//! global.

pub mod queue;
pub mod worker;

pub use queue::{QueueClosed, TaskQueue};
pub use worker::{PoolReport, WorkerPool};
