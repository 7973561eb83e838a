//! # Planificador de Peticiones
//! src/scheduler/mod.rs
//!
//! Implementa el núcleo de planificación del servidor: una cola acotada de
//! peticiones pendientes compartida entre los threads de admisión
//! (productores) y un pool fijo de workers (consumidores).
//!
//! ## Flujo
//!
//! ```text
//! Admisión → RequestQueue (insert según política) → Worker → Transmisor
//! ```
//!
//! - `request`: descriptor de una petición admitida (ruta, tamaño, conexión)
//! - `policy`: políticas de ordenamiento intercambiables (FIFO / SFF)
//! - `queue`: cola acotada con bloqueo por capacidad y por vacío
//! - `worker`: pool de workers que consumen la cola y sirven el contenido

pub mod request;
pub mod policy;
pub mod queue;
pub mod worker;

// Re-exportamos los tipos principales para facilitar su uso
pub use request::QueuedRequest;
pub use policy::{ArrivalOrder, PolicyKind, SchedulingPolicy, SmallestSizeFirst};
pub use queue::{QueueStats, RequestQueue};
pub use worker::{ContentTransmitter, WorkerPool};
