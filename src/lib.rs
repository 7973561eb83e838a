//! # Static Server
//! src/lib.rs
//!
//! Servidor HTTP/1.0 de archivos estáticos implementado desde cero para
//! demostrar conceptos de sistemas operativos: concurrencia, sincronización
//! y planificación de peticiones.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Parsing y manejo del protocolo HTTP/1.0
//! - `server`: Lógica del servidor TCP y ruta de admisión
//! - `scheduler`: Cola acotada de peticiones, políticas de planificación
//!   (FIFO / SFF) y pool de workers
//! - `content`: Resolución de rutas, tipos MIME y transmisión de archivos
//! - `metrics`: Recolección de métricas y observabilidad
//!
//! ## Ejemplo de uso
//!
//! ```ignore
//! use static_server::server::Server;
//! use static_server::config::Config;
//!
//! let config = Config::default();
//! let mut server = Server::new(config);
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod http;
pub mod config;
pub mod server;
pub mod scheduler;
pub mod content;
pub mod metrics;
