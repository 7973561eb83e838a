//! # Transmisión de Contenido Estático
//! src/content/transmit.rs
//!
//! Implementa el colaborador que los workers invocan para producir la
//! respuesta de una petición retirada de la cola: lee el archivo y escribe
//! la respuesta HTTP/1.0 completa (status line, headers, body) al socket.

use crate::content::mime::content_type_for;
use crate::http::{Response, StatusCode};
use crate::scheduler::ContentTransmitter;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Write};
use std::net::TcpStream;
use std::time::UNIX_EPOCH;

/// Nombre que se reporta en el header `Server`
pub const SERVER_NAME: &str = "RedUnix-Static/1.0";

/// Transmisor de archivos del filesystem.
///
/// La ruta que recibe ya fue resuelta y validada en la admisión; si el
/// archivo dejó de ser legible entre la admisión y el servicio, envía una
/// página de error 500 y reporta el fallo al worker.
pub struct FileTransmitter;

impl FileTransmitter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileTransmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentTransmitter for FileTransmitter {
    fn transmit(&self, stream: &mut TcpStream, path: &str, size: u64) -> io::Result<()> {
        match fs::read(path) {
            Ok(contents) => {
                let response = Response::new(StatusCode::Ok)
                    .with_header("Server", SERVER_NAME)
                    .with_header("Content-Type", content_type_for(path))
                    .with_header("ETag", &etag_for(path, size))
                    .with_body_bytes(contents);

                stream.write_all(&response.to_bytes())?;
                stream.flush()
            }
            Err(e) => {
                // El archivo existía en la admisión pero ya no se puede leer
                let response = Response::error_page(
                    StatusCode::InternalServerError,
                    path,
                    "server could not read this file",
                );
                let _ = stream.write_all(&response.to_bytes());
                let _ = stream.flush();
                Err(e)
            }
        }
    }
}

/// Calcula un ETag para el archivo: SHA256 sobre ruta, tamaño y mtime.
///
/// Cambia si el archivo se reemplaza o modifica, sin costo de leer el
/// contenido completo.
fn etag_for(path: &str, size: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_bytes());
    hasher.update(size.to_le_bytes());

    if let Ok(metadata) = fs::metadata(path) {
        if let Ok(modified) = metadata.modified() {
            if let Ok(since_epoch) = modified.duration_since(UNIX_EPOCH) {
                hasher.update(since_epoch.as_nanos().to_le_bytes());
            }
        }
    }

    let hex = format!("{:x}", hasher.finalize());
    format!("\"{}\"", &hex[..16])
}
