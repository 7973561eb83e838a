//! # Inferencia de Tipos MIME
//! src/content/mime.rs
//!
//! Mapea la extensión del archivo a su Content-Type. Para extensiones
//! desconocidas se responde `text/plain`.

use std::path::Path;

/// Retorna el Content-Type para la ruta dada, según su extensión
///
/// # Ejemplo
/// ```
/// use static_server::content::content_type_for;
///
/// assert_eq!(content_type_for("index.html"), "text/html");
/// assert_eq!(content_type_for("logo.png"), "image/png");
/// assert_eq!(content_type_for("notas"), "text/plain");
/// ```
pub fn content_type_for(path: &str) -> &'static str {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match extension.as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "txt" => "text/plain",
        "gif" => "image/gif",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "pdf" => "application/pdf",
        _ => "text/plain",
    }
}
