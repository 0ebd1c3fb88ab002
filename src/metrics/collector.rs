//! # Collector de Métricas
//! src/metrics/collector.rs
//!
//! Contadores agregados del servidor. Se comparten entre el accept loop y
//! los workers; el snapshot se serializa a JSON al apagar el servidor.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

/// Collector de métricas thread-safe
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsData>>,
    start_time: Instant,
}

/// Datos internos de métricas
#[derive(Default)]
struct MetricsData {
    /// Conexiones aceptadas por el accept loop
    accepted: u64,

    /// Conexiones cerradas sin respuesta (peer cerró o error de lectura)
    silent_closes: u64,

    /// Respuestas enviadas por código de estado
    status_codes: BTreeMap<u16, u64>,

    /// Bytes de body servidos en respuestas 200
    bytes_served: u64,
}

/// Vista inmutable de las métricas
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub accepted_connections: u64,
    pub total_responses: u64,
    pub silent_closes: u64,
    pub status_codes: BTreeMap<u16, u64>,
    pub bytes_served: u64,
}

impl MetricsCollector {
    /// Crea un nuevo collector de métricas
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsData::default())),
            start_time: Instant::now(),
        }
    }

    fn data(&self) -> MutexGuard<'_, MetricsData> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record_accepted(&self) {
        self.data().accepted += 1;
    }

    pub fn record_silent_close(&self) {
        self.data().silent_closes += 1;
    }

    /// Registra una respuesta enviada
    pub fn record_response(&self, status_code: u16, body_bytes: usize) {
        let mut data = self.data();
        *data.status_codes.entry(status_code).or_insert(0) += 1;
        if status_code == 200 {
            data.bytes_served += body_bytes as u64;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let data = self.data();
        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            accepted_connections: data.accepted,
            total_responses: data.status_codes.values().sum(),
            silent_closes: data.silent_closes,
            status_codes: data.status_codes.clone(),
            bytes_served: data.bytes_served,
        }
    }

    /// Obtiene las métricas actuales en formato JSON (una sola línea)
    pub fn get_metrics_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_empty_snapshot() {
        let metrics = MetricsCollector::new();
        let snapshot = metrics.snapshot();

        assert_eq!(snapshot.accepted_connections, 0);
        assert_eq!(snapshot.total_responses, 0);
        assert!(snapshot.status_codes.is_empty());
    }

    #[test]
    fn test_record_responses() {
        let metrics = MetricsCollector::new();
        metrics.record_accepted();
        metrics.record_accepted();
        metrics.record_accepted();
        metrics.record_response(200, 120);
        metrics.record_response(404, 13);
        metrics.record_silent_close();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.accepted_connections, 3);
        assert_eq!(snapshot.total_responses, 2);
        assert_eq!(snapshot.silent_closes, 1);
        assert_eq!(snapshot.status_codes.get(&200), Some(&1));
        assert_eq!(snapshot.status_codes.get(&404), Some(&1));
        // Solo cuentan los bytes de archivos servidos
        assert_eq!(snapshot.bytes_served, 120);
    }

    #[test]
    fn test_metrics_json() {
        let metrics = MetricsCollector::new();
        metrics.record_response(405, 18);

        let json: serde_json::Value = serde_json::from_str(&metrics.get_metrics_json()).unwrap();
        assert_eq!(json["total_responses"], 1);
        assert_eq!(json["status_codes"]["405"], 1);
    }

    #[test]
    fn test_concurrent_updates() {
        let metrics = MetricsCollector::new();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let metrics = metrics.clone();
                thread::spawn(move || {
                    for _ in 0..250 {
                        metrics.record_response(200, 1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_responses, 1000);
        assert_eq!(snapshot.bytes_served, 1000);
    }
}
