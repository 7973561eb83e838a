//! # Static Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor HTTP/1.0 de archivos estáticos.

use static_server::config::Config;
use static_server::server::Server;

fn main() {
    println!("=================================");
    println!("  RedUnix Static HTTP/1.0 Server");
    println!("  Principios de Sistemas Operativos");
    println!("=================================\n");

    // Parsear configuración desde CLI / variables de entorno
    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("💥 Configuración inválida: {}", e);
        std::process::exit(1);
    }

    config.print_summary();

    // Crear el servidor (esto levanta el pool de workers)
    let mut server = Server::new(config);

    // Iniciar el servidor (esto bloqueará el thread)
    if let Err(e) = server.run() {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }
}
