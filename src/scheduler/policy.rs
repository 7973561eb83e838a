//! # Políticas de Planificación
//! src/scheduler/policy.rs
//!
//! Define la abstracción de estrategia que decide en qué posición de la cola
//! se inserta cada petición nueva. La política se elige una sola vez al
//! construir la cola; el retiro siempre toma la cabeza, sin importar la
//! política, porque la inserción ya mantiene el orden requerido.

use crate::scheduler::request::QueuedRequest;
use clap::ValueEnum;
use std::collections::VecDeque;

/// Estrategia de ordenamiento de la cola de peticiones.
///
/// Cada implementación define únicamente la posición de inserción; la
/// remoción es siempre `pop_front` y no forma parte de la estrategia.
pub trait SchedulingPolicy: Send + Sync {
    /// Nombre corto de la política (para logs y métricas)
    fn name(&self) -> &'static str;

    /// Inserta `request` en `pending` en la posición que dicta la política
    fn insert(&self, pending: &mut VecDeque<QueuedRequest>, request: QueuedRequest);
}

/// FIFO estricto: las peticiones se sirven en orden de llegada.
///
/// Inserción al final de la cola, O(1).
pub struct ArrivalOrder;

impl SchedulingPolicy for ArrivalOrder {
    fn name(&self) -> &'static str {
        "fifo"
    }

    fn insert(&self, pending: &mut VecDeque<QueuedRequest>, request: QueuedRequest) {
        pending.push_back(request);
    }
}

/// Smallest File First: la cola se mantiene ordenada ascendentemente por
/// tamaño de archivo.
///
/// La petición nueva se inserta antes del primer elemento con tamaño
/// estrictamente mayor, es decir, después de todos los de tamaño igual o
/// menor. Esto preserva el orden de llegada entre peticiones del mismo
/// tamaño (inserción estable). Costo O(n) por inserción, con n acotado por
/// la capacidad de la cola.
///
/// Trade-off documentado: una petición grande puede esperar indefinidamente
/// mientras sigan llegando peticiones más pequeñas. SFF optimiza el tiempo
/// medio de respuesta a costa de la latencia de peor caso.
pub struct SmallestSizeFirst;

impl SchedulingPolicy for SmallestSizeFirst {
    fn name(&self) -> &'static str {
        "sff"
    }

    fn insert(&self, pending: &mut VecDeque<QueuedRequest>, request: QueuedRequest) {
        // Buscar el primer elemento estrictamente mayor que la petición nueva
        match pending.iter().position(|queued| queued.size() > request.size()) {
            Some(index) => pending.insert(index, request),
            None => pending.push_back(request),
        }
    }
}

/// Selector de política para la configuración CLI.
///
/// Se traduce una sola vez a la estrategia concreta al construir la cola;
/// no hay branching por política en los caminos de insert/retiro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyKind {
    /// Orden de llegada (FIFO)
    Fifo,

    /// Archivo más pequeño primero (SFF)
    Sff,
}

impl PolicyKind {
    /// Nombre corto, igual al que reporta la estrategia construida
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Fifo => "fifo",
            PolicyKind::Sff => "sff",
        }
    }

    /// Construye la estrategia concreta que usará la cola
    pub fn build(&self) -> Box<dyn SchedulingPolicy> {
        match self {
            PolicyKind::Fifo => Box::new(ArrivalOrder),
            PolicyKind::Sff => Box::new(SmallestSizeFirst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{TcpListener, TcpStream};

    /// Helper: crea un TcpStream de loopback para usar como canal de respuesta
    fn loopback_stream() -> TcpStream {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().unwrap();
        let _client = TcpStream::connect(addr).unwrap();
        let (stream, _) = listener.accept().unwrap();
        stream
    }

    fn make_request(path: &str, size: u64) -> QueuedRequest {
        QueuedRequest::new(path, size, loopback_stream())
    }

    fn sizes(pending: &VecDeque<QueuedRequest>) -> Vec<u64> {
        pending.iter().map(|r| r.size()).collect()
    }

    fn paths(pending: &VecDeque<QueuedRequest>) -> Vec<&str> {
        pending.iter().map(|r| r.path()).collect()
    }

    // ==================== ArrivalOrder ====================

    #[test]
    fn test_fifo_appends_to_tail() {
        let policy = ArrivalOrder;
        let mut pending = VecDeque::new();

        policy.insert(&mut pending, make_request("a", 50));
        policy.insert(&mut pending, make_request("b", 10));
        policy.insert(&mut pending, make_request("c", 30));

        // El orden es el de llegada, los tamaños no influyen
        assert_eq!(paths(&pending), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_fifo_name() {
        assert_eq!(ArrivalOrder.name(), "fifo");
    }

    // ==================== SmallestSizeFirst ====================

    #[test]
    fn test_sff_orders_by_size() {
        let policy = SmallestSizeFirst;
        let mut pending = VecDeque::new();

        policy.insert(&mut pending, make_request("a", 50));
        policy.insert(&mut pending, make_request("b", 10));
        policy.insert(&mut pending, make_request("c", 30));

        assert_eq!(sizes(&pending), vec![10, 30, 50]);
    }

    #[test]
    fn test_sff_insert_in_middle() {
        let policy = SmallestSizeFirst;
        let mut pending = VecDeque::new();

        policy.insert(&mut pending, make_request("a", 10));
        policy.insert(&mut pending, make_request("b", 40));
        policy.insert(&mut pending, make_request("c", 25));
        policy.insert(&mut pending, make_request("d", 100));

        assert_eq!(sizes(&pending), vec![10, 25, 40, 100]);
    }

    #[test]
    fn test_sff_is_stable_for_equal_sizes() {
        let policy = SmallestSizeFirst;
        let mut pending = VecDeque::new();

        policy.insert(&mut pending, make_request("first", 20));
        policy.insert(&mut pending, make_request("second", 20));
        policy.insert(&mut pending, make_request("third", 20));

        // Mismos tamaños: debe preservarse el orden de llegada
        assert_eq!(paths(&pending), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_sff_equal_size_goes_after_existing() {
        let policy = SmallestSizeFirst;
        let mut pending = VecDeque::new();

        policy.insert(&mut pending, make_request("small", 10));
        policy.insert(&mut pending, make_request("big", 90));
        policy.insert(&mut pending, make_request("small-later", 10));

        // La nueva de tamaño 10 va después de la existente de tamaño 10
        assert_eq!(paths(&pending), vec!["small", "small-later", "big"]);
    }

    #[test]
    fn test_sff_name() {
        assert_eq!(SmallestSizeFirst.name(), "sff");
    }

    // ==================== PolicyKind ====================

    #[test]
    fn test_policy_kind_build() {
        assert_eq!(PolicyKind::Fifo.build().name(), "fifo");
        assert_eq!(PolicyKind::Sff.build().name(), "sff");
    }

    #[test]
    fn test_policy_kind_as_str_matches_built_name() {
        for kind in [PolicyKind::Fifo, PolicyKind::Sff] {
            assert_eq!(kind.as_str(), kind.build().name());
        }
    }
}
