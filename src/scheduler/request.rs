//! # Descriptor de Petición
//! src/scheduler/request.rs
//!
//! Define el registro que viaja por la cola de planificación: la ruta ya
//! resuelta en el filesystem, el tamaño del archivo observado en la admisión
//! y la conexión por la que hay que responder.

use std::net::TcpStream;
use std::time::{Duration, Instant};

/// Una petición estática admitida, pendiente de ser servida.
///
/// El descriptor es inmutable después de su creación. La conexión (`stream`)
/// es propiedad exclusiva del descriptor mientras está encolado; al retirarlo
/// de la cola, la propiedad completa pasa al worker que lo retiró, que es el
/// único que puede escribir en la conexión y cerrarla.
#[derive(Debug)]
pub struct QueuedRequest {
    /// Ruta del archivo en el filesystem, ya resuelta y validada
    path: String,

    /// Tamaño en bytes del archivo al momento de la admisión.
    /// Solo se usa para decisiones de ordenamiento (SFF), no se revalida.
    size: u64,

    /// Conexión del cliente por la que se enviará la respuesta
    stream: TcpStream,

    /// Instante de admisión, para reportar tiempo de espera en cola
    admitted_at: Instant,
}

impl QueuedRequest {
    /// Crea un descriptor nuevo en el momento de la admisión
    ///
    /// # Ejemplo
    /// ```ignore
    /// let request = QueuedRequest::new("./public/index.html", 1024, stream);
    /// assert_eq!(request.size(), 1024);
    /// ```
    pub fn new(path: impl Into<String>, size: u64, stream: TcpStream) -> Self {
        Self {
            path: path.into(),
            size,
            stream,
            admitted_at: Instant::now(),
        }
    }

    /// Ruta resuelta del archivo solicitado
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Tamaño en bytes observado en la admisión
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Tiempo transcurrido desde que la petición fue admitida
    pub fn queue_wait(&self) -> Duration {
        self.admitted_at.elapsed()
    }

    /// Consume el descriptor y entrega sus partes al worker.
    ///
    /// Mover el `TcpStream` fuera del descriptor garantiza que exactamente
    /// un thread puede escribir en la conexión y cerrarla.
    pub fn into_parts(self) -> (String, u64, TcpStream) {
        (self.path, self.size, self.stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    /// Helper: crea un TcpStream de loopback para usar como canal de respuesta
    fn loopback_stream() -> TcpStream {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().unwrap();
        let _client = TcpStream::connect(addr).unwrap();
        let (stream, _) = listener.accept().unwrap();
        stream
    }

    #[test]
    fn test_new_request() {
        let request = QueuedRequest::new("./public/index.html", 1024, loopback_stream());

        assert_eq!(request.path(), "./public/index.html");
        assert_eq!(request.size(), 1024);
    }

    #[test]
    fn test_queue_wait_grows() {
        let request = QueuedRequest::new("./public/a.txt", 10, loopback_stream());

        let first = request.queue_wait();
        std::thread::sleep(Duration::from_millis(10));
        let second = request.queue_wait();

        assert!(second > first);
    }

    #[test]
    fn test_into_parts() {
        let request = QueuedRequest::new("./public/b.txt", 77, loopback_stream());
        let (path, size, stream) = request.into_parts();

        assert_eq!(path, "./public/b.txt");
        assert_eq!(size, 77);
        // El stream sigue siendo una conexión válida
        assert!(stream.peer_addr().is_ok());
    }

    #[test]
    fn test_zero_size_is_valid() {
        // Un archivo vacío es una petición válida
        let request = QueuedRequest::new("./public/empty.txt", 0, loopback_stream());
        assert_eq!(request.size(), 0);
    }
}
