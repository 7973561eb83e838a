//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración del servidor de archivos estáticos
//! con soporte completo para argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./static_server --port 8080 \
//!   --doc-root ./public \
//!   --queue-capacity 64 \
//!   --workers 4 \
//!   --policy sff
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 HTTP_HOST=0.0.0.0 SCHED_POLICY=fifo ./static_server
//! ```

use crate::scheduler::PolicyKind;
use clap::Parser;

/// Configuración del servidor HTTP/1.0 de archivos estáticos
#[derive(Debug, Clone, Parser)]
#[command(name = "static_server")]
#[command(about = "Servidor HTTP/1.0 de archivos estáticos con planificación FIFO/SFF")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio raíz del que se sirven los archivos
    #[arg(long = "doc-root", default_value = "./public", env = "DOC_ROOT")]
    pub doc_root: String,

    // === Cola de peticiones ===

    /// Capacidad máxima de la cola de peticiones pendientes.
    /// Cuando la cola está llena, la admisión se bloquea (backpressure),
    /// nunca se rechaza la petición.
    #[arg(long = "queue-capacity", default_value = "1000", env = "QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    /// Política de planificación de la cola:
    /// `fifo` (orden de llegada) o `sff` (archivo más pequeño primero)
    #[arg(long = "policy", value_enum, default_value = "fifo", env = "SCHED_POLICY")]
    pub policy: PolicyKind,

    // === Workers ===

    /// Número de workers que atienden peticiones de la cola
    #[arg(long = "workers", default_value = "4", env = "WORKERS")]
    pub workers: usize,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    ///
    /// # Ejemplo
    /// ```ignore
    /// use static_server::config::Config;
    ///
    /// let config = Config::new();
    /// println!("Server listening on {}", config.address());
    /// ```
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```
    /// use static_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("Workers must be >= 1".to_string());
        }

        if self.queue_capacity == 0 {
            return Err("Queue capacity must be >= 1".to_string());
        }

        if self.doc_root.trim().is_empty() {
            return Err("Document root must not be empty".to_string());
        }

        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("╔══════════════════════════════════════════════════════════════╗");
        println!("║        RedUnix Static HTTP/1.0 Server Configuration          ║");
        println!("╚══════════════════════════════════════════════════════════════╝");
        println!();
        println!("🌐 Network:");
        println!("   Address:      {}", self.address());
        println!("   Doc root:     {}", self.doc_root);
        println!();
        println!("📋 Request Queue & Workers:");
        println!("   ┌──────────────────┬───────────────┐");
        println!("   │ Queue capacity   │ {:^13} │", self.queue_capacity);
        println!("   │ Workers          │ {:^13} │", self.workers);
        println!("   │ Policy           │ {:^13} │", self.policy.as_str());
        println!("   └──────────────────┴───────────────┘");
        println!();
        if self.policy == PolicyKind::Sff {
            println!("   ⚠️  SFF optimiza el tiempo medio de respuesta, pero una");
            println!("      petición grande puede esperar indefinidamente si siguen");
            println!("      llegando peticiones más pequeñas (starvation aceptada).");
            println!();
        }
        println!("═══════════════════════════════════════════════════════════════");
        println!();
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            doc_root: "./public".to_string(),
            queue_capacity: 1000,
            policy: PolicyKind::Fifo,
            workers: 4,
        }
    }
}
