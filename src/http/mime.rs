//! # Tipos de contenido
//! src/http/mime.rs
//!
//! Tabla fija y ordenada. La comparación es por substring y distingue
//! mayúsculas: `foto.JPG` cae en `application/octet-stream`.

/// Tipo por defecto cuando ninguna entrada de la tabla coincide
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// (substring, content-type), evaluado en este orden
const CONTENT_TYPES: &[(&str, &str)] = &[
    (".html", "text/html"),
    (".txt", "text/plain"),
    (".jpg", "image/jpeg"),
    (".jpeg", "image/jpeg"),
    (".png", "image/png"),
];

/// Selecciona el content-type para un nombre de archivo
///
/// # Ejemplo
/// ```
/// use tinyhttpd::http::mime::content_type_for;
/// assert_eq!(content_type_for("index.html"), "text/html");
/// assert_eq!(content_type_for("archive.tar.gz"), "application/octet-stream");
/// ```
pub fn content_type_for(file_name: &str) -> &'static str {
    CONTENT_TYPES
        .iter()
        .find(|(needle, _)| file_name.contains(needle))
        .map(|(_, content_type)| *content_type)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

/// `true` para los tipos que el navegador muestra en línea.
/// El resto se envía con `Content-Disposition: attachment`.
pub fn is_inline(content_type: &str) -> bool {
    matches!(content_type, "text/html" | "text/plain")
}
