//! # TLS
//! src/server/tls.rs
//!
//! El certificado se carga una vez al arrancar desde un único archivo PEM
//! con la cadena de certificados y la clave privada. El handshake de cada
//! conexión corre en el thread del accept loop, con lecturas y escrituras
//! que expiran cada [`HANDSHAKE_POLL_INTERVAL`] para revisar el token de
//! apagado; un cliente que no completa el handshake en
//! [`HANDSHAKE_TIMEOUT`] se descarta.

use super::ShutdownToken;
use crate::error::TlsError;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::{ServerConnection, StreamOwned};
use std::fs;
use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Timeout de cada lectura/escritura durante el handshake
pub const HANDSHAKE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Tiempo máximo para completar el handshake
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Sesión TLS sobre un socket TCP
pub type TlsStream = StreamOwned<ServerConnection, TcpStream>;

/// Configuración de rustls lista para aceptar conexiones
#[derive(Debug, Clone)]
pub struct TlsAcceptor {
    config: Arc<rustls::ServerConfig>,
}

impl TlsAcceptor {
    /// Carga certificado y clave desde `path`
    pub fn from_pem_file(path: &Path) -> Result<Self, TlsError> {
        let pem = fs::read(path).map_err(|source| TlsError::ReadCertificate {
            path: path.to_path_buf(),
            source,
        })?;

        let certs: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut pem.as_slice())
            .collect::<Result<_, _>>()
            .map_err(|source| TlsError::ReadCertificate {
                path: path.to_path_buf(),
                source,
            })?;
        if certs.is_empty() {
            return Err(TlsError::NoCertificate {
                path: path.to_path_buf(),
            });
        }

        let key: PrivateKeyDer<'static> = rustls_pemfile::private_key(&mut pem.as_slice())
            .map_err(|source| TlsError::ReadCertificate {
                path: path.to_path_buf(),
                source,
            })?
            .ok_or_else(|| TlsError::NoPrivateKey {
                path: path.to_path_buf(),
            })?;

        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let config = rustls::ServerConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()?
            .with_no_client_auth()
            .with_single_cert(certs, key)?;

        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// Completa el handshake sobre `tcp`
    ///
    /// Se abandona si `shutdown` se activa o si pasa [`HANDSHAKE_TIMEOUT`].
    /// El socket que se entrega ya no tiene timeouts.
    pub fn accept(&self, tcp: TcpStream, shutdown: &ShutdownToken) -> Result<TlsStream, TlsError> {
        tcp.set_read_timeout(Some(HANDSHAKE_POLL_INTERVAL))
            .and_then(|_| tcp.set_write_timeout(Some(HANDSHAKE_POLL_INTERVAL)))
            .map_err(TlsError::Handshake)?;

        let connection = ServerConnection::new(Arc::clone(&self.config))?;
        let mut stream = StreamOwned::new(connection, tcp);
        let deadline = Instant::now() + HANDSHAKE_TIMEOUT;

        while stream.conn.is_handshaking() {
            match stream.conn.complete_io(&mut stream.sock) {
                Ok(_) => {}
                Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                    if shutdown.is_cancelled() {
                        return Err(TlsError::Cancelled);
                    }
                    if Instant::now() >= deadline {
                        return Err(TlsError::Handshake(io::Error::new(
                            io::ErrorKind::TimedOut,
                            "handshake not completed in time",
                        )));
                    }
                }
                Err(e) => return Err(TlsError::Handshake(e)),
            }
        }

        stream
            .sock
            .set_read_timeout(None)
            .and_then(|_| stream.sock.set_write_timeout(None))
            .map_err(TlsError::Handshake)?;

        Ok(stream)
    }
}

/// Conexión aceptada, en claro o con TLS
pub enum ClientStream {
    Plain(TcpStream),
    Tls(Box<TlsStream>),
}

impl ClientStream {
    /// Cierra la conexión; con TLS envía antes `close_notify`
    pub fn close(self) {
        match self {
            ClientStream::Plain(stream) => drop(stream),
            ClientStream::Tls(mut stream) => {
                stream.conn.send_close_notify();
                let _ = stream.flush();
            }
        }
    }
}

impl Read for ClientStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            ClientStream::Plain(stream) => stream.read(buf),
            ClientStream::Tls(stream) => stream.read(buf),
        }
    }
}

impl Write for ClientStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            ClientStream::Plain(stream) => stream.write(buf),
            ClientStream::Tls(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            ClientStream::Plain(stream) => stream.flush(),
            ClientStream::Tls(stream) => stream.flush(),
        }
    }
}
