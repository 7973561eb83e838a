//! # Collector de Métricas
//! src/metrics/collector.rs
//!
//! Recolecta y agrega métricas del servidor en tiempo real: cuántas
//! peticiones se atendieron, con qué status, cuánto esperaron en cola y
//! cuánto tardó la fase de servicio.

use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Máximo de muestras de latencia retenidas para percentiles
const MAX_SAMPLES: usize = 10_000;

/// Collector de métricas thread-safe
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsData>>,
    start_time: Instant,
}

/// Datos internos de métricas
struct MetricsData {
    /// Contador total de requests respondidos
    total_requests: u64,

    /// Requests por código de estado
    status_codes: HashMap<u16, u64>,

    /// Latencias de la fase de servicio (en microsegundos)
    service_latencies: Vec<u64>,

    /// Tiempos de espera en cola (en microsegundos)
    queue_waits: Vec<u64>,

    /// Requests por ruta
    requests_per_path: HashMap<String, u64>,

    /// Workers actualmente en fase de servicio
    busy_workers: u64,
}

impl MetricsCollector {
    /// Crea un nuevo collector de métricas
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsData {
                total_requests: 0,
                status_codes: HashMap::new(),
                service_latencies: Vec::with_capacity(MAX_SAMPLES),
                queue_waits: Vec::with_capacity(MAX_SAMPLES),
                requests_per_path: HashMap::new(),
                busy_workers: 0,
            })),
            start_time: Instant::now(),
        }
    }

    /// Registra un request respondido con su status y latencia de servicio
    pub fn record_request(&self, path: &str, status_code: u16, latency: Duration) {
        let mut data = self.inner.lock().unwrap();

        data.total_requests += 1;
        *data.status_codes.entry(status_code).or_insert(0) += 1;
        *data.requests_per_path.entry(path.to_string()).or_insert(0) += 1;

        let latency_us = latency.as_micros() as u64;
        push_sample(&mut data.service_latencies, latency_us);
    }

    /// Registra cuánto esperó una petición en la cola antes de ser retirada
    pub fn record_queue_wait(&self, wait: Duration) {
        let mut data = self.inner.lock().unwrap();
        let wait_us = wait.as_micros() as u64;
        push_sample(&mut data.queue_waits, wait_us);
    }

    /// Incrementa el contador de workers en fase de servicio
    pub fn increment_busy_workers(&self) {
        let mut data = self.inner.lock().unwrap();
        data.busy_workers += 1;
    }

    /// Decrementa el contador de workers en fase de servicio
    pub fn decrement_busy_workers(&self) {
        let mut data = self.inner.lock().unwrap();
        if data.busy_workers > 0 {
            data.busy_workers -= 1;
        }
    }

    /// Obtiene el número de workers ocupados
    pub fn busy_workers(&self) -> u64 {
        let data = self.inner.lock().unwrap();
        data.busy_workers
    }

    /// Total de requests registrados
    pub fn total_requests(&self) -> u64 {
        let data = self.inner.lock().unwrap();
        data.total_requests
    }

    /// Snapshot de las métricas actuales como documento JSON
    pub fn snapshot(&self) -> Value {
        let data = self.inner.lock().unwrap();

        let status_codes: HashMap<String, u64> = data
            .status_codes
            .iter()
            .map(|(code, count)| (code.to_string(), *count))
            .collect();

        // Top 10 rutas más pedidas
        let mut paths: Vec<_> = data.requests_per_path.iter().collect();
        paths.sort_by(|a, b| b.1.cmp(a.1));
        let top_paths: Vec<Value> = paths
            .iter()
            .take(10)
            .map(|(path, count)| json!({ "path": path, "count": count }))
            .collect();

        json!({
            "uptime_secs": self.start_time.elapsed().as_secs(),
            "total_requests": data.total_requests,
            "busy_workers": data.busy_workers,
            "status_codes": status_codes,
            "service_latency_us": latency_summary(&data.service_latencies),
            "queue_wait_us": latency_summary(&data.queue_waits),
            "top_paths": top_paths,
        })
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Agrega una muestra descartando la más antigua si se llegó al límite
fn push_sample(samples: &mut Vec<u64>, value: u64) {
    if samples.len() >= MAX_SAMPLES {
        samples.remove(0);
    }
    samples.push(value);
}

/// Resumen de una serie de latencias: promedio y percentiles
fn latency_summary(samples: &[u64]) -> Value {
    if samples.is_empty() {
        return json!({ "count": 0, "avg": 0, "p50": 0, "p95": 0, "p99": 0 });
    }

    let mut sorted = samples.to_vec();
    sorted.sort_unstable();

    let sum: u64 = sorted.iter().sum();
    let avg = sum / sorted.len() as u64;

    json!({
        "count": sorted.len(),
        "avg": avg,
        "p50": percentile(&sorted, 50.0),
        "p95": percentile(&sorted, 95.0),
        "p99": percentile(&sorted, 99.0),
    })
}

/// Percentil sobre una serie ya ordenada
fn percentile(sorted: &[u64], p: f64) -> u64 {
    let index = ((p / 100.0) * (sorted.len() - 1) as f64).round() as usize;
    sorted[index]
}
