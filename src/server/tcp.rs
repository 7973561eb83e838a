//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Implementación del servidor TCP y de la ruta de admisión. Cada conexión
//! aceptada se procesa en su propio thread, que parsea y valida el request
//! y, si es una petición estática válida, la admite en la cola compartida.
//! A partir de ahí la sirve alguno de los workers del pool.

use crate::config::Config;
use crate::content::resolve::resolve;
use crate::content::FileTransmitter;
use crate::http::{ParseError, Request, Response, StatusCode};
use crate::metrics::MetricsCollector;
use crate::scheduler::{ContentTransmitter, QueuedRequest, RequestQueue, WorkerPool};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Servidor HTTP/1.0 de archivos estáticos con cola de planificación
pub struct Server {
    config: Config,
    queue: RequestQueue,
    metrics: MetricsCollector,
    workers: WorkerPool,
    listener: Option<TcpListener>,
}

impl Server {
    /// Construye el servidor y arranca el pool de workers.
    ///
    /// La política de planificación se traduce aquí, una única vez, a la
    /// estrategia concreta que usará la cola durante toda su vida.
    pub fn new(config: Config) -> Self {
        let queue = RequestQueue::new(config.queue_capacity, config.policy.build());
        let metrics = MetricsCollector::new();

        let transmitter: Arc<dyn ContentTransmitter> = Arc::new(FileTransmitter::new());
        let workers = WorkerPool::spawn(
            config.workers,
            queue.clone(),
            transmitter,
            metrics.clone(),
        );

        Self {
            config,
            queue,
            metrics,
            workers,
            listener: None,
        }
    }

    /// Hace bind del listener y retorna la dirección local real.
    ///
    /// Separado de `run()` para que los tests puedan usar el puerto 0
    /// (efímero) y conocer la dirección asignada.
    pub fn bind(&mut self) -> std::io::Result<SocketAddr> {
        let address = self.config.address();
        println!("[*] Iniciando servidor en {}", address);

        let listener = TcpListener::bind(&address)?;
        let local_addr = listener.local_addr()?;
        self.listener = Some(listener);

        Ok(local_addr)
    }

    /// Loop principal: acepta conexiones y lanza un thread de admisión
    /// por cada una
    pub fn run(&mut self) -> std::io::Result<()> {
        if self.listener.is_none() {
            let addr = self.bind()?;
            println!("[+] Servidor escuchando en {}", addr);
        }

        println!(
            "[*] Política: {} | Capacidad de cola: {} | Workers: {}\n",
            self.queue.policy_name(),
            self.queue.capacity(),
            self.workers.size()
        );

        let listener = self.listener.as_ref().unwrap();

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let queue = self.queue.clone();
                    let metrics = self.metrics.clone();
                    let doc_root = PathBuf::from(&self.config.doc_root);

                    let peer_addr = stream
                        .peer_addr()
                        .map(|addr| addr.to_string())
                        .unwrap_or_else(|_| "unknown".to_string());

                    println!(" ✅ Nueva conexión desde: {} (spawning admission thread)", peer_addr);

                    thread::spawn(move || {
                        if let Err(e) = Self::handle_connection(stream, queue, metrics, &doc_root) {
                            eprintln!("   ❌ Error en admisión: {}", e);
                        }
                    });
                }
                Err(e) => {
                    eprintln!("   ❌ Error al aceptar conexión: {}", e);
                }
            }
        }

        Ok(())
    }

    /// Ruta de admisión: parsea, valida y encola una petición estática.
    ///
    /// Este thread no debe tener ningún lock al llamar `admit`; si la cola
    /// está llena se bloquea aquí (backpressure hacia el cliente) en vez de
    /// rechazar la petición.
    fn handle_connection(
        mut stream: TcpStream,
        queue: RequestQueue,
        metrics: MetricsCollector,
        doc_root: &Path,
    ) -> std::io::Result<()> {
        let start = Instant::now();

        let mut buffer = [0u8; 8192];
        let bytes_read = stream.read(&mut buffer)?;

        if bytes_read == 0 {
            println!("   ✅ Conexión cerrada");
            return Ok(());
        }

        let request = match Request::parse(&buffer[..bytes_read]) {
            Ok(request) => request,
            Err(ParseError::UnsupportedMethod(method)) => {
                println!("   ❌ Método no soportado: {}", method);
                return Self::reject(
                    stream,
                    &metrics,
                    StatusCode::NotImplemented,
                    "/error",
                    &method,
                    "server only implements GET",
                    start,
                );
            }
            Err(e) => {
                println!("   ❌ Parse error: {}", e);
                return Self::reject(
                    stream,
                    &metrics,
                    StatusCode::BadRequest,
                    "/error",
                    &e.to_string(),
                    "could not parse the request",
                    start,
                );
            }
        };

        let path = request.path().to_string();
        println!("   ✅ GET {}", path);

        // Endpoint reservado de observabilidad: se responde aquí mismo,
        // nunca pasa por la cola
        if path == "/metrics" {
            let document = Self::metrics_document(&metrics, &queue);
            let response = Response::json(&document);
            stream.write_all(&response.to_bytes())?;
            stream.flush()?;
            metrics.record_request("/metrics", 200, start.elapsed());
            return Ok(());
        }

        match resolve(doc_root, &path) {
            Ok(target) => {
                println!(
                    "   📥 Admitting {} ({} bytes)",
                    target.path.display(),
                    target.size
                );

                // La propiedad del stream pasa al descriptor; desde aquí
                // solo el worker que lo retire puede tocar la conexión
                let descriptor = QueuedRequest::new(
                    target.path.to_string_lossy().into_owned(),
                    target.size,
                    stream,
                );
                queue.admit(descriptor);
                Ok(())
            }
            Err(error) => {
                println!("   ❌ {}", error);
                Self::reject(
                    stream,
                    &metrics,
                    error.status(),
                    &path,
                    &path,
                    error.detail(),
                    start,
                )
            }
        }
    }

    /// Responde una página de error desde el thread de admisión
    fn reject(
        mut stream: TcpStream,
        metrics: &MetricsCollector,
        status: StatusCode,
        metric_path: &str,
        cause: &str,
        detail: &str,
        start: Instant,
    ) -> std::io::Result<()> {
        let response = Response::error_page(status, cause, detail);
        stream.write_all(&response.to_bytes())?;
        stream.flush()?;

        metrics.record_request(metric_path, status.as_u16(), start.elapsed());
        Ok(())
    }

    /// Compone el documento de `/metrics`: snapshot del collector más las
    /// estadísticas de la cola de planificación
    fn metrics_document(metrics: &MetricsCollector, queue: &RequestQueue) -> String {
        let mut document = metrics.snapshot();
        document["request_queue"] =
            serde_json::to_value(queue.stats()).unwrap_or(serde_json::Value::Null);
        document.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::PolicyKind;
    use std::fs;

    fn ephemeral_listener() -> TcpListener {
        TcpListener::bind("127.0.0.1:0").expect("bind")
    }

    /// Helper: crea un doc root temporal único para el test
    fn temp_doc_root(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "static_server_tcp_{}_{}",
            std::process::id(),
            tag
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Ejecuta la ruta de admisión para un request crudo cuya respuesta se
    /// escribe desde el propio thread de admisión (errores y /metrics)
    fn run_admission(raw: &[u8], doc_root: &Path) -> (String, RequestQueue) {
        let listener = ephemeral_listener();
        let addr = listener.local_addr().unwrap();

        let queue = RequestQueue::new(8, PolicyKind::Fifo.build());
        let metrics = MetricsCollector::new();

        let t = thread::spawn({
            let queue = queue.clone();
            let metrics = metrics.clone();
            let doc_root = doc_root.to_path_buf();
            move || {
                let (stream, _) = listener.accept().unwrap();
                Server::handle_connection(stream, queue, metrics, &doc_root).unwrap();
            }
        });

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(raw).unwrap();
        client.shutdown(std::net::Shutdown::Write).unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        t.join().unwrap();

        (String::from_utf8_lossy(&buf).to_string(), queue)
    }

    #[test]
    fn test_not_found_page() {
        let root = temp_doc_root("notfound");
        let (text, queue) = run_admission(b"GET /nope.html HTTP/1.0\r\n\r\n", &root);

        assert!(text.contains("404 Not Found"));
        assert!(text.contains("server could not find this file"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_traversal_forbidden() {
        let root = temp_doc_root("traversal");
        let (text, queue) = run_admission(b"GET /../etc/passwd HTTP/1.0\r\n\r\n", &root);

        assert!(text.contains("403 Forbidden"));
        assert!(text.contains("Traversing up in filesystem is not allowed"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_post_not_implemented() {
        let root = temp_doc_root("post");
        let (text, queue) = run_admission(b"POST /upload HTTP/1.0\r\n\r\n", &root);

        assert!(text.contains("501 Not Implemented"));
        assert!(text.contains("server only implements GET"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_bad_request_on_garbage() {
        let root = temp_doc_root("garbage");
        let (text, queue) = run_admission(b"\x00\x01\x02\x03garbage", &root);

        assert!(text.contains("400 Bad Request"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_metrics_endpoint_never_queued() {
        let root = temp_doc_root("metrics");
        let (text, queue) = run_admission(b"GET /metrics HTTP/1.0\r\n\r\n", &root);

        assert!(text.contains("200 OK"));
        assert!(text.contains("\"total_requests\""));
        // Incluye las estadísticas de la cola de planificación
        assert!(text.contains("\"request_queue\""));
        assert!(text.contains("\"policy\""));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_admission_queues_descriptor() {
        let root = temp_doc_root("admit");
        fs::write(root.join("hello.txt"), b"hola").unwrap();

        let listener = ephemeral_listener();
        let addr = listener.local_addr().unwrap();

        let queue = RequestQueue::new(8, PolicyKind::Fifo.build());
        let metrics = MetricsCollector::new();

        let t = thread::spawn({
            let queue = queue.clone();
            let metrics = metrics.clone();
            let root = root.clone();
            move || {
                let (stream, _) = listener.accept().unwrap();
                Server::handle_connection(stream, queue, metrics, &root).unwrap();
            }
        });

        let mut client = TcpStream::connect(addr).unwrap();
        client
            .write_all(b"GET /hello.txt HTTP/1.0\r\n\r\n")
            .unwrap();
        t.join().unwrap();

        // La petición quedó encolada con la ruta resuelta y el tamaño
        // observado; la conexión es ahora propiedad del descriptor
        assert_eq!(queue.len(), 1);
        let descriptor = queue.withdraw();
        assert!(descriptor.path().ends_with("hello.txt"));
        assert_eq!(descriptor.size(), 4);
    }

    #[test]
    fn test_peer_closed_immediately() {
        // Cubre la rama bytes_read == 0
        let listener = ephemeral_listener();
        let addr = listener.local_addr().unwrap();

        let queue = RequestQueue::new(8, PolicyKind::Fifo.build());
        let metrics = MetricsCollector::new();
        let root = temp_doc_root("closed");

        let t = thread::spawn({
            let queue = queue.clone();
            move || {
                let (stream, _) = listener.accept().unwrap();
                Server::handle_connection(stream, queue, metrics, &root).unwrap();
            }
        });

        // Cliente que conecta y cierra inmediatamente sin mandar datos
        drop(TcpStream::connect(addr).unwrap());

        t.join().unwrap();
        assert!(queue.is_empty());
    }
}
