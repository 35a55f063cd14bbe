//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! API para construir respuestas y escribirlas en la conexión.
//!
//! ## Formato
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: image/png\r\n
//! Content-Length: 4\r\n
//! Content-Disposition: attachment; filename="logo.png"\r\n
//! \r\n
//! <bytes>
//! ```
//!
//! Los headers conservan el orden en que se agregaron.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use tinyhttpd::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("Content-Type", "text/plain")
//!     .with_body("Hello");
//!
//! let bytes = response.to_bytes();
//! assert!(bytes.ends_with(b"\r\n\r\nHello"));
//! ```

use super::StatusCode;
use std::io::{self, Write};

/// Versión que se escribe en la status line
const HTTP_VERSION: &str = "HTTP/1.1";

/// Cuántos `write` se usan para enviar la respuesta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Status line, headers y body en un solo envío (archivos)
    Single,

    /// Primero el bloque de headers, después el body (listados)
    HeadThenBody,
}

/// Representa una respuesta HTTP completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP
    status: StatusCode,

    /// Headers en orden de inserción
    headers: Vec<(String, String)>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,

    delivery: Delivery,
}

impl Response {
    /// Crea una nueva respuesta sin headers ni body
    ///
    /// # Ejemplo
    /// ```
    /// use tinyhttpd::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::Ok);
    /// assert!(response.headers().is_empty());
    /// ```
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
            delivery: Delivery::Single,
        }
    }

    /// Agrega un header a la respuesta
    ///
    /// Si el header ya existe, se sobrescribe en su posición original.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Agrega un header a una respuesta existente (versión mutable)
    pub fn add_header(&mut self, name: &str, value: &str) {
        match self.headers.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Establece el cuerpo desde un string y calcula `Content-Length`
    pub fn with_body(self, body: &str) -> Self {
        self.with_body_bytes(body.as_bytes().to_vec())
    }

    /// Establece el cuerpo desde bytes y calcula `Content-Length`
    ///
    /// # Ejemplo
    /// ```
    /// use tinyhttpd::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::Ok)
    ///     .with_body_bytes(vec![0x89, 0x50, 0x4E, 0x47]);
    /// assert_eq!(response.header("Content-Length"), Some("4"));
    /// ```
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        let length = self.body.len().to_string();
        self.add_header("Content-Length", &length);
        self
    }

    /// Cambia el modo de envío
    pub fn with_delivery(mut self, delivery: Delivery) -> Self {
        self.delivery = delivery;
        self
    }

    /// Status line y headers, incluida la línea vacía final
    pub fn head_bytes(&self) -> Vec<u8> {
        let mut head = format!("{} {}\r\n", HTTP_VERSION, self.status);
        for (name, value) in &self.headers {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str("\r\n");
        head.into_bytes()
    }

    /// Convierte la respuesta completa a bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = self.head_bytes();
        result.extend_from_slice(&self.body);
        result
    }

    /// Escribe la respuesta respetando el modo de envío
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        match self.delivery {
            Delivery::Single => writer.write_all(&self.to_bytes())?,
            Delivery::HeadThenBody => {
                writer.write_all(&self.head_bytes())?;
                writer.write_all(&self.body)?;
            }
        }
        writer.flush()
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Busca un header por nombre exacto
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Obtiene los headers en orden
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn delivery(&self) -> Delivery {
        self.delivery
    }
}
