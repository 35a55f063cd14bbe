//! # Parsing de Requests HTTP/1.x
//! src/http/request.rs
//!
//! El parser trabaja sobre el resultado de **una sola lectura** del socket
//! (ver [`READ_BUFFER_SIZE`]). Un request que llega partido en varios
//! segmentos TCP más allá de esa primera lectura no se reensambla: los
//! headers que no entraron simplemente no se ven.
//!
//! ## Formato de un Request
//!
//! ```text
//! GET /docs/a%20b.txt HTTP/1.1\r\n
//! Host: localhost:8080\r\n
//! X-Forwarded-For: 203.0.113.7\r\n
//! \r\n
//! ```
//!
//! ## Qué se extrae
//!
//! 1. **Request Line**: método, path crudo y versión (separados por los dos
//!    primeros espacios, terminada por el primer `\r\n`)
//! 2. **X-Forwarded-For**: si existe, reemplaza la IP del peer en el log
//! 3. **Path decodificado**: `%XX` → byte, `+` → espacio
//!
//! El path decodificado se guarda como bytes (`OsString`), no como UTF-8:
//! un nombre de archivo que no es UTF-8 válido se puede pedir igual con
//! `%XX`. El body se ignora.

use percent_encoding::percent_decode;
use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStringExt;

/// Tamaño de la única lectura que se hace por conexión
pub const READ_BUFFER_SIZE: usize = 4096;

/// Header que sobrescribe la IP del cliente (sensible a mayúsculas)
const FORWARDED_FOR_HEADER: &str = "X-Forwarded-For:";

/// Request parseado. Inmutable una vez construido.
#[derive(Debug, Clone)]
pub struct Request {
    /// Método tal cual llegó (no se valida)
    method: String,

    /// Path sin decodificar (ej: "/a%20b.txt"), UTF-8 con pérdida
    raw_path: String,

    /// Path decodificado byte a byte, el único que se usa para tocar el filesystem
    path: OsString,

    /// Versión HTTP tal cual llegó (ej: "HTTP/1.1")
    version: String,

    /// IP del peer, o el valor de X-Forwarded-For si venía
    client_ip: String,

    /// Bytes crudos leídos del socket (UTF-8 con pérdida)
    raw: String,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// El peer no envió nada
    #[error("Empty request")]
    EmptyRequest,

    /// Falta alguno de los delimitadores de la request line
    #[error("Malformed request line")]
    MalformedRequest,
}

impl Request {
    /// Parsea un request desde los bytes de la primera lectura
    ///
    /// # Argumentos
    ///
    /// * `buffer` - Bytes leídos del socket
    /// * `peer_ip` - IP del peer, usada si no hay `X-Forwarded-For`
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use tinyhttpd::http::Request;
    ///
    /// let raw = b"GET /a%20b.txt HTTP/1.1\r\nX-Forwarded-For: 10.0.0.9\r\n\r\n";
    /// let request = Request::parse(raw, "127.0.0.1").unwrap();
    ///
    /// assert_eq!(request.path(), "/a b.txt");
    /// assert_eq!(request.client_ip(), "10.0.0.9");
    /// ```
    pub fn parse(buffer: &[u8], peer_ip: &str) -> Result<Self, ParseError> {
        if buffer.is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        // 1. Request line, sobre los bytes tal cual llegaron
        let line_end = buffer
            .windows(2)
            .position(|w| w == b"\r\n")
            .ok_or(ParseError::MalformedRequest)?;
        let (method, rest) = split_at_space(&buffer[..line_end])?;
        let (raw_path, version) = split_at_space(rest)?;

        // 2. Headers: solo nos interesa X-Forwarded-For
        let headers = String::from_utf8_lossy(&buffer[line_end + 2..]);
        let client_ip = forwarded_for(&headers).unwrap_or(peer_ip).to_string();

        Ok(Request {
            method: String::from_utf8_lossy(method).into_owned(),
            raw_path: String::from_utf8_lossy(raw_path).into_owned(),
            path: url_decode(raw_path),
            version: String::from_utf8_lossy(version).into_owned(),
            client_ip,
            raw: String::from_utf8_lossy(buffer).into_owned(),
        })
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Obtiene el path tal como vino en la request line
    pub fn raw_path(&self) -> &str {
        &self.raw_path
    }

    /// Obtiene el path decodificado
    pub fn path(&self) -> &OsStr {
        &self.path
    }

    /// Obtiene la versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }

    /// IP que se registra en el access log
    pub fn client_ip(&self) -> &str {
        &self.client_ip
    }

    /// Request completo tal como se leyó
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// Parte en el primer espacio
fn split_at_space(bytes: &[u8]) -> Result<(&[u8], &[u8]), ParseError> {
    let pos = bytes
        .iter()
        .position(|&b| b == b' ')
        .ok_or(ParseError::MalformedRequest)?;
    Ok((&bytes[..pos], &bytes[pos + 1..]))
}

/// Busca el primer `X-Forwarded-For:` antes de la línea vacía.
///
/// Solo cuenta el primer header que coincide; si su valor está vacío no hay override.
fn forwarded_for(headers: &str) -> Option<&str> {
    for line in headers.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            break;
        }

        if let Some(value) = line.strip_prefix(FORWARDED_FOR_HEADER) {
            let value = value.trim_matches(|c| c == ' ' || c == '\t');
            return (!value.is_empty()).then_some(value);
        }
    }

    None
}

/// Decodifica un path de URL
///
/// - `+` → espacio
/// - `%XX` → el byte `0xXX`
/// - un `%` sin dos dígitos hex detrás queda literal, junto con lo que le siga
///
/// El resultado no tiene por qué ser UTF-8: `%E9` es el byte `0xE9`.
///
/// # Ejemplo
/// ```
/// use tinyhttpd::http::request::url_decode;
///
/// assert_eq!(url_decode("/hello+world%21"), "/hello world!");
/// assert_eq!(url_decode("/100%"), "/100%");
/// assert_eq!(url_decode("/%2B"), "/+");
/// ```
pub fn url_decode(raw: impl AsRef<[u8]>) -> OsString {
    // '+' primero: así un "%2B" decodificado sobrevive como '+'
    let spaced: Vec<u8> = raw
        .as_ref()
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    OsString::from_vec(percent_decode(&spaced).collect())
}
