//! # Resolución de Rutas
//! src/content/resolve.rs
//!
//! Traduce el path de una petición HTTP a una ruta concreta dentro del
//! directorio raíz de documentos, validando que sea un archivo regular
//! accesible y rechazando intentos de salir del doc root.

use crate::http::StatusCode;
use std::fs;
use std::path::{Path, PathBuf};

/// Archivo resuelto y validado, listo para encolar
#[derive(Debug, Clone)]
pub struct ResolvedFile {
    /// Ruta concreta en el filesystem
    pub path: PathBuf,

    /// Tamaño en bytes observado en el `stat` de la admisión
    pub size: u64,
}

/// Errores de resolución, cada uno con su status HTTP
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// El path intenta subir en el filesystem (`..`)
    Traversal(String),

    /// El archivo no existe
    NotFound(String),

    /// El destino existe pero no es un archivo regular
    NotAFile(String),
}

impl ResolveError {
    /// Status HTTP con el que se responde este error
    pub fn status(&self) -> StatusCode {
        match self {
            ResolveError::Traversal(_) => StatusCode::Forbidden,
            ResolveError::NotFound(_) => StatusCode::NotFound,
            ResolveError::NotAFile(_) => StatusCode::Forbidden,
        }
    }

    /// Mensaje para la página de error
    pub fn detail(&self) -> &'static str {
        match self {
            ResolveError::Traversal(_) => "Traversing up in filesystem is not allowed",
            ResolveError::NotFound(_) => "server could not find this file",
            ResolveError::NotAFile(_) => "server could not read this file",
        }
    }
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::Traversal(p) => write!(f, "Path traversal rejected: {}", p),
            ResolveError::NotFound(p) => write!(f, "File not found: {}", p),
            ResolveError::NotAFile(p) => write!(f, "Not a regular file: {}", p),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Resuelve el path de una petición dentro de `doc_root`.
///
/// Reglas:
/// - Cualquier path que contenga `..` se rechaza con 403.
/// - `/` (o cualquier path que termine en `/`) se mapea a `index.html`.
/// - El destino debe existir y ser un archivo regular.
///
/// Retorna la ruta concreta y el tamaño observado, que es el que usará la
/// política de planificación (no se revalida al servir).
///
/// # Ejemplo
/// ```ignore
/// let file = resolve(Path::new("./public"), "/index.html")?;
/// println!("{} bytes", file.size);
/// ```
pub fn resolve(doc_root: &Path, uri_path: &str) -> Result<ResolvedFile, ResolveError> {
    if uri_path.contains("..") {
        return Err(ResolveError::Traversal(uri_path.to_string()));
    }

    let mut relative = uri_path.trim_start_matches('/').to_string();
    if relative.is_empty() || relative.ends_with('/') {
        relative.push_str("index.html");
    }

    let path = doc_root.join(relative);

    let metadata =
        fs::metadata(&path).map_err(|_| ResolveError::NotFound(uri_path.to_string()))?;

    if !metadata.is_file() {
        return Err(ResolveError::NotAFile(uri_path.to_string()));
    }

    Ok(ResolvedFile {
        path,
        size: metadata.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    /// Helper: crea un doc root temporal único para el test
    fn temp_doc_root(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "static_server_resolve_{}_{}",
            std::process::id(),
            tag
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_file(dir: &Path, name: &str, contents: &[u8]) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(contents).unwrap();
    }

    #[test]
    fn test_resolve_regular_file() {
        let root = temp_doc_root("regular");
        write_file(&root, "hello.txt", b"hola mundo");

        let resolved = resolve(&root, "/hello.txt").unwrap();
        assert_eq!(resolved.size, 10);
        assert!(resolved.path.ends_with("hello.txt"));
    }

    #[test]
    fn test_resolve_root_maps_to_index() {
        let root = temp_doc_root("index");
        write_file(&root, "index.html", b"<html></html>");

        let resolved = resolve(&root, "/").unwrap();
        assert!(resolved.path.ends_with("index.html"));
        assert_eq!(resolved.size, 13);
    }

    #[test]
    fn test_resolve_subdir_trailing_slash_maps_to_index() {
        let root = temp_doc_root("subdir");
        fs::create_dir_all(root.join("docs")).unwrap();
        write_file(&root.join("docs"), "index.html", b"docs");

        let resolved = resolve(&root, "/docs/").unwrap();
        assert!(resolved.path.ends_with("index.html"));
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let root = temp_doc_root("traversal");

        let result = resolve(&root, "/../etc/passwd");
        assert!(matches!(&result, Err(ResolveError::Traversal(_))));
        assert_eq!(result.unwrap_err().status(), StatusCode::Forbidden);
    }

    #[test]
    fn test_resolve_rejects_embedded_traversal() {
        let root = temp_doc_root("embedded");

        let result = resolve(&root, "/docs/../../secret.txt");
        assert!(matches!(result, Err(ResolveError::Traversal(_))));
    }

    #[test]
    fn test_resolve_missing_file() {
        let root = temp_doc_root("missing");

        let result = resolve(&root, "/nope.html");
        assert!(matches!(&result, Err(ResolveError::NotFound(_))));
        assert_eq!(result.unwrap_err().status(), StatusCode::NotFound);
    }

    #[test]
    fn test_resolve_directory_without_slash_is_not_a_file() {
        let root = temp_doc_root("dir");
        fs::create_dir_all(root.join("docs")).unwrap();

        let result = resolve(&root, "/docs");
        assert!(matches!(&result, Err(ResolveError::NotAFile(_))));
        assert_eq!(result.unwrap_err().status(), StatusCode::Forbidden);
    }

    #[test]
    fn test_resolve_error_details() {
        assert_eq!(
            ResolveError::Traversal("/..".into()).detail(),
            "Traversing up in filesystem is not allowed"
        );
        assert_eq!(
            ResolveError::NotFound("/x".into()).detail(),
            "server could not find this file"
        );
    }
}
