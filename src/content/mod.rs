//! # Contenido Estático
//! src/content/mod.rs
//!
//! Todo lo relativo a los archivos servidos:
//! - `resolve`: mapeo de URI a ruta dentro del doc root, con rechazo de
//!   path traversal
//! - `mime`: inferencia de Content-Type por extensión
//! - `transmit`: transmisor que escribe la respuesta completa al socket

pub mod resolve;
pub mod mime;
pub mod transmit;

// Re-exportar para facilitar el uso
pub use resolve::{resolve, ResolveError, ResolvedFile};
pub use mime::content_type_for;
pub use transmit::FileTransmitter;
