//! # Sistema de Métricas
//! src/metrics/mod.rs
//!
//! Este módulo implementa la recolección y agregación de métricas del
//! servidor:
//! - Contadores de requests por status y por ruta
//! - Latencias de servicio (p50, p95, p99)
//! - Tiempo de espera en cola
//! - Workers ocupados

pub mod collector;

pub use collector::MetricsCollector;
