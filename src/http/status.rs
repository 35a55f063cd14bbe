//! # Códigos de Estado HTTP
//! src/http/status.rs
//!
//! Tabla fija de códigos que el servidor sabe escribir en la status line.
//! Cualquier código fuera de la tabla se escribe como `500 Internal Server Error`.
//!
//! - **1xx**: `100 Continue`, `101 Switching Protocols`
//! - **2xx**: `200 OK`
//! - **4xx**: `404 Not Found` (solo en el access log, ver `files::synthesize`)
//! - **5xx**: `500 Internal Server Error` (valor por defecto)

/// Representa los códigos de estado HTTP que soporta nuestro servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 100 Continue
    Continue = 100,

    /// 101 Switching Protocols
    SwitchingProtocols = 101,

    /// 200 OK - La petición fue exitosa
    Ok = 200,

    /// 404 Not Found - El archivo pedido no se pudo abrir
    NotFound = 404,

    /// 500 Internal Server Error - Cualquier código que no esté en la tabla
    InternalServerError = 500,
}

impl StatusCode {
    /// Mapea un código numérico a la tabla fija
    ///
    /// # Ejemplo
    /// ```
    /// use tinyhttpd::http::StatusCode;
    /// assert_eq!(StatusCode::from_u16(200), StatusCode::Ok);
    /// assert_eq!(StatusCode::from_u16(418), StatusCode::InternalServerError);
    /// ```
    pub fn from_u16(code: u16) -> Self {
        match code {
            100 => StatusCode::Continue,
            101 => StatusCode::SwitchingProtocols,
            200 => StatusCode::Ok,
            404 => StatusCode::NotFound,
            _ => StatusCode::InternalServerError,
        }
    }

    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use tinyhttpd::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    ///
    /// # Ejemplo
    /// ```
    /// use tinyhttpd::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Continue => "Continue",
            StatusCode::SwitchingProtocols => "Switching Protocols",
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
