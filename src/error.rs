//! # Errores del servidor
//! src/error.rs
//!
//! Dos familias con alcance distinto:
//!
//! - **Fatales** ([`ServerError`], [`ConfigError`]): terminan el proceso con código 1.
//! - **Por conexión** ([`ConnectionError`], [`TlsError::Handshake`]): se loguean,
//!   se cierra esa conexión y el dispatcher sigue aceptando.

use crate::http::ParseError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errores que detienen el dispatcher
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind to socket {port}: {source}")]
    Bind { port: u16, source: io::Error },

    #[error("Listener failed: {source}")]
    Listen { source: io::Error },

    #[error("Client socket accept failed: {source}")]
    Accept { source: io::Error },

    #[error(transparent)]
    Tls(#[from] TlsError),
}

/// Errores de TLS: carga del certificado (fatal) o handshake (por conexión)
#[derive(Error, Debug)]
pub enum TlsError {
    #[error("Failed to read SSL certificate {path:?}: {source}")]
    ReadCertificate { path: PathBuf, source: io::Error },

    #[error("No certificate found in {path:?}")]
    NoCertificate { path: PathBuf },

    #[error("No private key found in {path:?}")]
    NoPrivateKey { path: PathBuf },

    #[error("Invalid TLS configuration: {0}")]
    Config(#[from] rustls::Error),

    #[error("TLS handshake failed: {0}")]
    Handshake(io::Error),

    #[error("TLS handshake abandoned: server is shutting down")]
    Cancelled,
}

/// Errores de validación de la configuración
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Path to serve is not a directory: {0:?}")]
    RootNotDirectory(PathBuf),

    #[error("SSL certificate not found: {0:?}")]
    CertificateMissing(PathBuf),
}

/// Errores aislados a una conexión
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Failed to read request: {0}")]
    Read(io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Failed to send response: {0}")]
    Write(io::Error),
}
