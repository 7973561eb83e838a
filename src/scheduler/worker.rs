//! # Pool de Workers
//! src/scheduler/worker.rs
//!
//! Un conjunto fijo de threads simétricos que consumen la cola de
//! peticiones. Cada worker repite dos fases:
//!
//! 1. **Despacho**: `withdraw()` sobre la cola (la única fase que toca
//!    estado compartido, dentro de la sección crítica de la cola).
//! 2. **Servicio**: entregar el descriptor al transmisor de contenido y
//!    cerrar la conexión, sin ningún lock tomado.
//!
//! Regla de diseño: la fase de servicio jamás se ejecuta dentro de la
//! sección crítica de la cola; de lo contrario la latencia de I/O de una
//! petición serializaría la admisión y a todos los demás workers.

use crate::metrics::MetricsCollector;
use crate::scheduler::queue::RequestQueue;
use std::io;
use std::net::TcpStream;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Colaborador que produce la respuesta completa para una petición retirada.
///
/// El worker lo invoca con la conexión, la ruta ya resuelta y el tamaño
/// observado en la admisión. El transmisor es responsable de escribir una
/// respuesta bien formada (status line, headers, body) y de señalar
/// éxito/fallo para que el worker cierre la conexión en ambos casos.
pub trait ContentTransmitter: Send + Sync + 'static {
    fn transmit(&self, stream: &mut TcpStream, path: &str, size: u64) -> io::Result<()>;
}

/// Pool fijo de workers consumidores de la cola de peticiones.
///
/// El número de workers se fija al arrancar y no cambia durante la vida
/// del proceso; ningún worker está distinguido, cualquiera puede servir
/// cualquier petición.
pub struct WorkerPool {
    handles: Vec<thread::JoinHandle<()>>,
}

impl WorkerPool {
    /// Lanza `count` workers que consumen `queue` y sirven con `transmitter`
    pub fn spawn(
        count: usize,
        queue: RequestQueue,
        transmitter: Arc<dyn ContentTransmitter>,
        metrics: MetricsCollector,
    ) -> Self {
        let mut handles = Vec::with_capacity(count);

        for i in 0..count {
            let queue = queue.clone();
            let transmitter = Arc::clone(&transmitter);
            let metrics = metrics.clone();

            handles.push(thread::spawn(move || {
                Self::worker_loop(format!("W-{}", i), queue, transmitter, metrics)
            }));
        }

        Self { handles }
    }

    /// Número de workers del pool
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Loop principal del worker: retirar, servir, cerrar, repetir
    fn worker_loop(
        name: String,
        queue: RequestQueue,
        transmitter: Arc<dyn ContentTransmitter>,
        metrics: MetricsCollector,
    ) {
        println!("🔧 Worker {} started", name);

        loop {
            // Fase de despacho: única interacción con estado compartido
            let request = queue.withdraw();

            metrics.increment_busy_workers();
            metrics.record_queue_wait(request.queue_wait());

            // El descriptor se desarma aquí: este worker pasa a ser el
            // único dueño de la conexión
            let (path, size, mut stream) = request.into_parts();
            println!("🔨 Worker {} serving {} ({} bytes)", name, path, size);

            // Fase de servicio, fuera de cualquier lock
            let start = Instant::now();
            let status = match transmitter.transmit(&mut stream, &path, size) {
                Ok(()) => {
                    println!(
                        "✅ Worker {} completed {} ({:.2}ms)",
                        name,
                        path,
                        start.elapsed().as_secs_f64() * 1000.0
                    );
                    200
                }
                Err(e) => {
                    // Sin reintentos: se registra el fallo, se cierra la
                    // conexión y el worker sigue con la próxima petición
                    eprintln!("❌ Worker {} failed {}: {}", name, path, e);
                    500
                }
            };

            metrics.record_request(&path, status, start.elapsed());
            metrics.decrement_busy_workers();

            // Cierre del canal de respuesta, pase lo que pase con la
            // transmisión
            drop(stream);
        }
    }
}
