//! # Configuración del Servidor
//! src/config.rs
//!
//! Argumentos CLI y variables de entorno, convertidos en un [`ServerConfig`]
//! inmutable que el dispatcher comparte (solo lectura) con cada worker.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! tinyhttpd -port 8080
//! tinyhttpd -port 8443 -ssl /path/to/ssl/certificate.pem
//! tinyhttpd -port 8000 -d -path /srv/www
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! TINYHTTPD_PORT=8080 TINYHTTPD_PATH=/srv/www tinyhttpd
//! ```

use crate::error::ConfigError;
use crate::logging::LogFormat;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Flags de un solo guión que se aceptan por compatibilidad (`-port 8080`)
const SINGLE_DASH_FLAGS: &[(&str, &str)] = &[
    ("-port", "--port"),
    ("-ssl", "--ssl"),
    ("-path", "--path"),
    ("-debug", "--debug"),
    ("-help", "--help"),
    ("-version", "--version"),
    ("-v", "--version"),
];

/// Argumentos de línea de comandos
#[derive(Debug, Clone, Parser)]
#[command(name = "tinyhttpd")]
#[command(about = "tinyhttpd - A small HTTP server")]
#[command(version)]
#[command(after_help = "Examples:\n  tinyhttpd -port 8080\n  tinyhttpd -port 8443 -ssl /path/to/ssl/certificate.pem\n  tinyhttpd -port 8000 -d")]
pub struct Cli {
    /// Specify the port number to bind on
    #[arg(long, env = "TINYHTTPD_PORT", value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// Enable SSL/TLS support and specify SSL certificate path
    #[arg(long = "ssl", value_name = "SSL_CERT_PATH", env = "TINYHTTPD_SSL_CERT")]
    pub ssl: Option<PathBuf>,

    /// Enable debug mode
    #[arg(short, long, env = "TINYHTTPD_DEBUG")]
    pub debug: bool,

    /// Path to serve files from
    #[arg(long, default_value = ".", env = "TINYHTTPD_PATH")]
    pub path: PathBuf,

    /// Address to bind on
    #[arg(long, default_value = "0.0.0.0", env = "TINYHTTPD_HOST")]
    pub host: String,

    /// Access log format
    #[arg(long = "log-format", value_enum, default_value_t = LogFormat::Common, env = "TINYHTTPD_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Milliseconds to wait for in-flight connections on shutdown
    #[arg(long = "grace-period-ms", default_value = "5000", env = "TINYHTTPD_GRACE_PERIOD_MS")]
    pub grace_period_ms: u64,
}

impl Cli {
    /// Valida los argumentos y construye la configuración inmutable
    pub fn into_config(self) -> Result<ServerConfig, ConfigError> {
        if !self.path.is_dir() {
            return Err(ConfigError::RootNotDirectory(self.path));
        }

        if let Some(cert) = &self.ssl {
            if !cert.exists() {
                return Err(ConfigError::CertificateMissing(cert.clone()));
            }
        }

        Ok(ServerConfig {
            root: self.path,
            host: self.host,
            port: self.port,
            tls_cert: self.ssl,
            debug: self.debug,
            log_format: self.log_format,
            grace_period: Duration::from_millis(self.grace_period_ms),
        })
    }
}

/// Reescribe los flags de un guión a su forma larga para que clap los entienda
///
/// # Ejemplo
/// ```
/// use tinyhttpd::config::normalize_args;
///
/// let args = normalize_args(["tinyhttpd", "-port", "8080", "-d"].map(String::from));
/// assert_eq!(args, vec!["tinyhttpd", "--port", "8080", "-d"]);
/// ```
pub fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .map(|arg| {
            SINGLE_DASH_FLAGS
                .iter()
                .find(|(short, _)| *short == arg)
                .map(|(_, long)| long.to_string())
                .unwrap_or(arg)
        })
        .collect()
}

/// Configuración inmutable del servidor
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directorio que se expone como `/`
    pub root: PathBuf,

    /// Host/IP en el que escucha
    pub host: String,

    /// Puerto (0 = efímero, solo usado en tests)
    pub port: u16,

    /// Certificado PEM (cadena + clave privada); habilita TLS
    pub tls_cert: Option<PathBuf>,

    /// Vuelca requests y responses crudos al log
    pub debug: bool,

    pub log_format: LogFormat,

    /// Espera máxima por workers en vuelo al apagar
    pub grace_period: Duration,
}

impl ServerConfig {
    /// Configuración por defecto sirviendo `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use tinyhttpd::config::ServerConfig;
    ///
    /// let config = ServerConfig::default();
    /// assert_eq!(config.address(), "0.0.0.0:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn tls_enabled(&self) -> bool {
        self.tls_cert.is_some()
    }

    /// Loguea un resumen de la configuración
    pub fn log_summary(&self) {
        tracing::info!("Address:      {}", self.address());
        tracing::info!("Serving:      {}", self.root.display());
        tracing::info!("TLS:          {}", if self.tls_enabled() { "enabled" } else { "disabled" });
        tracing::info!("Debug:        {}", self.debug);
        tracing::debug!("Grace period: {} ms", self.grace_period.as_millis());
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            host: "0.0.0.0".to_string(),
            port: 8080,
            tls_cert: None,
            debug: false,
            log_format: LogFormat::Common,
            grace_period: Duration::from_millis(5_000),
        }
    }
}
