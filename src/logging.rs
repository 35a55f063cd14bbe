//! # Logging
//! src/logging.rs
//!
//! Inicialización de `tracing` y el access log.
//!
//! Cada request parseado produce exactamente una línea de access log, en
//! Common Log Format:
//!
//! ```text
//! 203.0.113.7 - - [16/Oct/2026:10:04:59 +0000] "GET /docs/ HTTP/1.1" 200
//! ```
//!
//! o, con `--log-format json`, como un objeto JSON con los mismos campos.
//! En modo debug además se vuelcan el request y la respuesta crudos.

use crate::http::{Request, Response, StatusCode};
use chrono::Utc;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Formato del timestamp del access log
pub const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Target de tracing para las líneas de access log
pub const ACCESS_TARGET: &str = "tinyhttpd::access";

/// Formato de las líneas de access log
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// `ip - - [time] "METHOD path version" status`
    Common,
    /// Un objeto JSON por línea
    Json,
}

/// Instala el subscriber global
///
/// `RUST_LOG` tiene prioridad; si no está, el nivel es `debug` con `-d`
/// e `info` sin él.
pub fn init(debug: bool) -> anyhow::Result<()> {
    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

/// Un evento de access log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessLogEntry {
    pub client_ip: String,
    pub timestamp: String,
    pub method: String,
    pub path: String,
    pub version: String,
    pub status: u16,
}

impl AccessLogEntry {
    /// Crea la entrada para un request con el timestamp actual (UTC)
    pub fn new(request: &Request, status: StatusCode) -> Self {
        Self {
            client_ip: request.client_ip().to_string(),
            timestamp: Utc::now().format(TIMESTAMP_FORMAT).to_string(),
            method: request.method().to_string(),
            path: request.path().to_string_lossy().into_owned(),
            version: request.version().to_string(),
            status: status.as_u16(),
        }
    }

    pub fn render(&self, format: LogFormat) -> String {
        match format {
            LogFormat::Common => self.to_string(),
            LogFormat::Json => serde_json::to_string(self).unwrap_or_else(|_| self.to_string()),
        }
    }
}

impl std::fmt::Display for AccessLogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - - [{}] \"{} {} {}\" {}",
            self.client_ip, self.timestamp, self.method, self.path, self.version, self.status
        )
    }
}

/// Emite la línea de access log
pub fn log_access(entry: &AccessLogEntry, format: LogFormat) {
    tracing::info!(target: ACCESS_TARGET, "{}", entry.render(format));
}

pub fn log_request_dump(request: &Request) {
    tracing::debug!("Request: {}", request.raw());
}

pub fn log_response_dump(response: &Response) {
    tracing::debug!("Response: {}", String::from_utf8_lossy(&response.to_bytes()));
}
