//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! Este módulo implementa el dispatcher TCP que:
//! 1. Crea el socket, lo bindea y escucha (backlog 3)
//! 2. Acepta conexiones de a una, con handshake TLS si está habilitado
//! 3. Lanza un thread por conexión que parsea, resuelve y responde
//! 4. Al apagarse deja de aceptar y espera a los workers en vuelo
//!
//! ```text
//! Unbound ──bind──▶ Bound ──listen──▶ Listening ──run──▶ Accepting ⟲ ──shutdown──▶ Stopped
//! ```

pub mod connection;
pub mod shutdown;
pub mod tcp;
pub mod tls;

// Re-exportar para facilitar el uso
pub use shutdown::ShutdownToken;
pub use tcp::Server;

use crate::config::ServerConfig;
use crate::files::Footer;
use crate::platform;

/// Estado de solo lectura compartido por todos los workers
#[derive(Debug, Clone)]
pub struct ServerContext {
    pub config: ServerConfig,
    pub footer: Footer,
}

impl ServerContext {
    /// Crea el contexto para un servidor escuchando en `port`
    pub fn new(config: ServerConfig, port: u16) -> Self {
        Self {
            config,
            footer: Footer {
                os_description: platform::os_description(),
                port,
            },
        }
    }
}
