//! # Cola Acotada de Peticiones
//! src/scheduler/queue.rs
//!
//! Implementa la cola thread-safe de capacidad fija que comparten los
//! threads de admisión (productores) y el pool de workers (consumidores).
//!
//! ## Contrato
//!
//! - `admit` se bloquea mientras la cola está llena (backpressure: nunca se
//!   rechaza ni se descarta una petición) y luego inserta según la política
//!   activa.
//! - `withdraw` se bloquea mientras la cola está vacía y luego retira la
//!   cabeza, transfiriendo la propiedad completa del descriptor al caller.
//!
//! Ambas operaciones protegen el estado con un único mutex cuyo alcance es
//! solo el cuerpo de admit/withdraw; el lock nunca se mantiene durante la
//! fase de servicio. Las dos condiciones de espera ("hay espacio" y "hay
//! elementos") se implementan como condvars sobre ese mismo mutex, con
//! re-chequeo del predicado al despertar (seguro ante spurious wakeups).

use crate::scheduler::policy::SchedulingPolicy;
use crate::scheduler::request::QueuedRequest;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};

/// Estado interno protegido por el mutex
struct QueueState {
    /// Peticiones pendientes, siempre ordenadas según la política activa
    pending: VecDeque<QueuedRequest>,

    /// Total de peticiones admitidas desde la construcción
    admitted_total: u64,

    /// Total de peticiones retiradas desde la construcción
    served_total: u64,
}

/// Cola acotada de peticiones con política de ordenamiento inyectada.
///
/// La política se fija en la construcción y no cambia durante la vida de la
/// cola. Clonar la cola produce un handle al mismo estado compartido (el
/// mutex interno es la única puerta de mutación).
pub struct RequestQueue {
    inner: Arc<Mutex<QueueState>>,

    /// Se señala cuando una admisión deja elementos disponibles
    not_empty: Arc<Condvar>,

    /// Se señala cuando un retiro libera un slot de capacidad
    not_full: Arc<Condvar>,

    /// Capacidad máxima, fija desde la construcción
    capacity: usize,

    /// Política de inserción activa
    policy: Arc<dyn SchedulingPolicy>,
}

impl RequestQueue {
    /// Crea una cola con capacidad fija y la política de ordenamiento dada
    ///
    /// # Panics
    ///
    /// Si `capacity` es 0 (una cola sin slots bloquearía toda admisión).
    pub fn new(capacity: usize, policy: Box<dyn SchedulingPolicy>) -> Self {
        assert!(capacity > 0, "queue capacity must be positive");

        Self {
            inner: Arc::new(Mutex::new(QueueState {
                pending: VecDeque::with_capacity(capacity),
                admitted_total: 0,
                served_total: 0,
            })),
            not_empty: Arc::new(Condvar::new()),
            not_full: Arc::new(Condvar::new()),
            capacity,
            policy: Arc::from(policy),
        }
    }

    /// Admite una petición en la cola.
    ///
    /// Si la cola está llena, el thread llamante se bloquea hasta que un
    /// worker libere un slot; la petición nunca se rechaza ni se pierde.
    /// Una vez insertada (en la posición que dicta la política), se
    /// despierta a un consumidor que espere por elementos.
    ///
    /// El caller no debe tener ningún lock al invocar.
    pub fn admit(&self, request: QueuedRequest) {
        let mut state = self.inner.lock().unwrap();

        // Re-chequear el predicado al despertar: otro productor pudo
        // habernos ganado el slot entre el signal y la re-adquisición
        while state.pending.len() == self.capacity {
            state = self.not_full.wait(state).unwrap();
        }

        self.policy.insert(&mut state.pending, request);
        state.admitted_total += 1;

        self.not_empty.notify_one();
    }

    /// Retira la cabeza de la cola, bloqueando mientras esté vacía.
    ///
    /// La cabeza es siempre el frente de la secuencia: la política gobierna
    /// la inserción, no la remoción. La propiedad completa del descriptor
    /// (incluida su conexión) se transfiere al caller.
    pub fn withdraw(&self) -> QueuedRequest {
        let mut state = self.inner.lock().unwrap();

        while state.pending.is_empty() {
            state = self.not_empty.wait(state).unwrap();
        }

        // Invariante: tras salir del wait-loop la cola no está vacía
        let request = state
            .pending
            .pop_front()
            .expect("non-empty queue returned no head element");
        state.served_total += 1;

        self.not_full.notify_one();

        request
    }

    /// Número de peticiones actualmente encoladas
    pub fn len(&self) -> usize {
        let state = self.inner.lock().unwrap();
        state.pending.len()
    }

    /// Verifica si la cola está vacía
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capacidad máxima de la cola
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Nombre de la política activa
    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Snapshot de estadísticas para el endpoint de métricas
    pub fn stats(&self) -> QueueStats {
        let state = self.inner.lock().unwrap();

        QueueStats {
            queued: state.pending.len(),
            capacity: self.capacity,
            policy: self.policy.name(),
            admitted_total: state.admitted_total,
            served_total: state.served_total,
        }
    }
}

impl Clone for RequestQueue {
    /// Handle adicional al mismo estado compartido
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            not_empty: Arc::clone(&self.not_empty),
            not_full: Arc::clone(&self.not_full),
            capacity: self.capacity,
            policy: Arc::clone(&self.policy),
        }
    }
}

/// Estadísticas de la cola en un instante dado
#[derive(Debug, Clone, Serialize)]
pub struct QueueStats {
    pub queued: usize,
    pub capacity: usize,
    pub policy: &'static str,
    pub admitted_total: u64,
    pub served_total: u64,
}
