//! # Servicio de archivos
//! src/files/mod.rs
//!
//! Convierte un [`ResolvedTarget`] en la respuesta que se envía:
//!
//! - **Archivo**: `200 OK`, content-type por extensión, `Content-Length`
//!   exacto y `Content-Disposition: attachment` para lo que no es texto/HTML.
//! - **Directorio**: listado HTML, siempre `200 OK`.
//! - **No encontrado**: listado del root en `/`. El cliente recibe `200 OK`
//!   pero el access log registra `404`.

pub mod listing;
pub mod resolver;

pub use listing::Footer;
pub use resolver::{resolve, ResolvedTarget};

use crate::http::{mime, Delivery, Response, StatusCode};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::Path;

/// Respuesta a enviar junto con el status que va al access log
#[derive(Debug, Clone)]
pub struct Reply {
    pub response: Response,
    pub logged_status: StatusCode,
}

/// Sintetiza la respuesta para un target ya resuelto
pub fn synthesize(target: ResolvedTarget, root: &Path, footer: &Footer) -> Reply {
    match target {
        ResolvedTarget::ServeFile(path) => match file_response(&path, StatusCode::Ok) {
            Ok(response) => Reply {
                response,
                logged_status: StatusCode::Ok,
            },
            Err(e) => {
                tracing::debug!("Failed to read {}: {}", path.display(), e);
                not_found(root, footer)
            }
        },
        ResolvedTarget::ServeDirectoryListing { dir, request_path } => Reply {
            response: listing_response(&dir, &request_path, footer),
            logged_status: StatusCode::Ok,
        },
        ResolvedTarget::NotFound => not_found(root, footer),
    }
}

/// Respuesta con el contenido completo de un archivo
///
/// # Ejemplo
/// ```no_run
/// use std::path::Path;
/// use tinyhttpd::files::file_response;
/// use tinyhttpd::http::StatusCode;
///
/// let response = file_response(Path::new("/srv/logo.png"), StatusCode::Ok).unwrap();
/// assert_eq!(response.header("Content-Type"), Some("image/png"));
/// ```
pub fn file_response(path: &Path, status: StatusCode) -> io::Result<Response> {
    let content = fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = mime::content_type_for(&file_name);

    let mut response = Response::new(status)
        .with_header("Content-Type", content_type)
        .with_body_bytes(content);

    if !mime::is_inline(content_type) {
        response.add_header(
            "Content-Disposition",
            &format!("attachment; filename=\"{}\"", quoted_filename(&file_name)),
        );
    }

    Ok(response)
}

/// Nombre apto para ir entre comillas en un header: escapa `"` y `\` y
/// reemplaza los caracteres de control (CR, LF, ...) por `_`
fn quoted_filename(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            c if c.is_control() => quoted.push('_'),
            c => quoted.push(c),
        }
    }
    quoted
}

/// Listado HTML de `dir`, enviado en dos partes (headers y body)
pub fn listing_response(dir: &Path, request_path: impl AsRef<OsStr>, footer: &Footer) -> Response {
    let body = listing::render_listing(dir, request_path, footer);

    Response::new(StatusCode::Ok)
        .with_header("Content-Type", "text/html")
        .with_body(&body)
        .with_delivery(Delivery::HeadThenBody)
}

/// Listado del root en `/`, registrado como 404
fn not_found(root: &Path, footer: &Footer) -> Reply {
    let root_dir = resolver::concat_path(root, "/");
    Reply {
        response: listing_response(&root_dir, "/", footer),
        logged_status: StatusCode::NotFound,
    }
}
