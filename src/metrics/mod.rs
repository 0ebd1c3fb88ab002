//! # Sistema de Métricas
//! src/metrics/mod.rs
//!
//! Contadores del servidor:
//! - Conexiones aceptadas
//! - Respuestas por código de estado
//! - Cierres silenciosos
//! - Bytes servidos

pub mod collector;

pub use collector::{MetricsCollector, MetricsSnapshot};
