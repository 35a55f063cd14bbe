//! # Worker por conexión
//! src/server/connection.rs
//!
//! Pipeline que corre en el thread de cada conexión:
//!
//! ```text
//! read (una vez, 4096 bytes) → Request::parse → resolve → synthesize → write
//! ```
//!
//! Un request malformado se descarta sin respuesta. La lectura y la
//! escritura son bloqueantes y sin timeout: un cliente que no envía nada
//! mantiene ocupado su thread.

use super::ServerContext;
use crate::error::ConnectionError;
use crate::files;
use crate::http::request::READ_BUFFER_SIZE;
use crate::http::Request;
use crate::logging::{self, AccessLogEntry};
use std::io::{Read, Write};

/// Atiende un request sobre `stream`
///
/// No cierra el stream; de eso se encarga quien lo creó.
pub fn handle_connection<S: Read + Write>(
    stream: &mut S,
    peer_ip: &str,
    context: &ServerContext,
) -> Result<(), ConnectionError> {
    let mut buffer = [0u8; READ_BUFFER_SIZE];
    let bytes_read = stream.read(&mut buffer).map_err(ConnectionError::Read)?;

    if bytes_read == 0 {
        tracing::debug!("Connection from {} closed before sending a request", peer_ip);
        return Ok(());
    }

    let request = Request::parse(&buffer[..bytes_read], peer_ip)?;
    if context.config.debug {
        logging::log_request_dump(&request);
    }

    let target = files::resolve(&context.config.root, request.path());
    let reply = files::synthesize(target, &context.config.root, &context.footer);

    logging::log_access(
        &AccessLogEntry::new(&request, reply.logged_status),
        context.config.log_format,
    );

    reply
        .response
        .write_to(stream)
        .map_err(ConnectionError::Write)?;

    if context.config.debug {
        logging::log_response_dump(&reply.response);
    }

    Ok(())
}
