//! # tinyhttpd
//! src/lib.rs
//!
//! Servidor HTTP/1.x minimalista que sirve archivos estáticos desde un
//! directorio raíz, con listado de directorios y TLS opcional.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `config`: CLI y configuración inmutable del servidor
//! - `http`: Parsing del request, tablas de status y content-type, respuesta
//! - `files`: Resolución de paths y síntesis de respuestas (archivo o listado)
//! - `server`: Accept loop, worker por conexión, TLS y apagado
//! - `logging`: Subscriber de tracing y access log
//! - `platform`: Descripción del sistema operativo para el footer
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use tinyhttpd::config::ServerConfig;
//! use tinyhttpd::server::{Server, ShutdownToken};
//!
//! let config = ServerConfig::new("/srv/www");
//! let server = Server::bind(config, ShutdownToken::new()).expect("bind");
//! server.run().expect("accept loop");
//! ```

pub mod config;
pub mod error;
pub mod files;
pub mod http;
pub mod logging;
pub mod platform;
pub mod server;

/// Nombre con el que el servidor se identifica en el footer del listado
pub const SERVER_NAME: &str = "tinyhttpd";

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
