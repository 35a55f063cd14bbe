//! # Módulo HTTP
//!
//! El subconjunto de HTTP/1.1 que habla el servidor, del lado servidor:
//!
//! - Parsing de la request line y del header `X-Forwarded-For`
//! - Construcción de responses con headers ordenados
//! - Tabla fija de status codes y de content-types
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path HTTP/1.1\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! ```
//!
//! No hay keep-alive, chunked encoding ni rangos: una conexión, un request,
//! una respuesta.

pub mod mime;
pub mod request;
pub mod response;
pub mod status;

pub use request::{ParseError, Request};
pub use response::{Delivery, Response};
pub use status::StatusCode;
