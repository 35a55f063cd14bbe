//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Accept loop con un thread por conexión. No hay pool ni límite de
//! conexiones: cada `accept` exitoso lanza un worker y el loop vuelve a
//! aceptar sin esperar.
//!
//! El listener es no bloqueante para poder consultar el [`ShutdownToken`]
//! cada [`ACCEPT_POLL_INTERVAL`]; los sockets aceptados sí son bloqueantes.

use super::connection::handle_connection;
use super::tls::{ClientStream, TlsAcceptor};
use super::{ServerContext, ShutdownToken};
use crate::config::ServerConfig;
use crate::error::{ConnectionError, ServerError, TlsError};
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Backlog de `listen`
pub const LISTEN_BACKLOG: i32 = 3;

/// Cada cuánto se revisa el token de apagado mientras no hay conexiones
pub const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Servidor HTTP escuchando y listo para aceptar
pub struct Server {
    listener: TcpListener,
    context: Arc<ServerContext>,
    tls: Option<TlsAcceptor>,
    shutdown: ShutdownToken,
    workers: Vec<JoinHandle<()>>,
}

impl Server {
    /// Crea el socket, lo bindea y empieza a escuchar
    ///
    /// Con `-ssl` también carga el certificado. Cualquier fallo es fatal.
    pub fn bind(config: ServerConfig, shutdown: ShutdownToken) -> Result<Self, ServerError> {
        let tls = match &config.tls_cert {
            Some(path) => {
                tracing::info!("Enabling SSL support.");
                Some(TlsAcceptor::from_pem_file(path)?)
            }
            None => None,
        };

        let listener = Self::listen(&config)?;
        let port = listener
            .local_addr()
            .map_err(|source| ServerError::Listen { source })?
            .port();

        Ok(Self {
            listener,
            context: Arc::new(ServerContext::new(config, port)),
            tls,
            shutdown,
            workers: Vec::new(),
        })
    }

    /// Unbound → Bound → Listening
    fn listen(config: &ServerConfig) -> Result<TcpListener, ServerError> {
        let bind_error = |source: io::Error| ServerError::Bind {
            port: config.port,
            source,
        };

        let address = config
            .address()
            .to_socket_addrs()
            .map_err(bind_error)?
            .next()
            .ok_or_else(|| bind_error(io::Error::new(io::ErrorKind::AddrNotAvailable, "no address")))?;

        let socket = Socket::new(Domain::for_address(address), Type::STREAM, Some(Protocol::TCP))
            .map_err(bind_error)?;
        socket.set_reuse_address(true).map_err(bind_error)?;
        socket.bind(&address.into()).map_err(bind_error)?;
        tracing::debug!("Bound to {}", address);

        socket
            .listen(LISTEN_BACKLOG)
            .map_err(|source| ServerError::Listen { source })?;

        let listener: TcpListener = socket.into();
        listener
            .set_nonblocking(true)
            .map_err(|source| ServerError::Listen { source })?;

        Ok(listener)
    }

    /// Dirección real en la que escucha (útil con puerto 0)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn context(&self) -> &ServerContext {
        &self.context
    }

    /// Accept loop. Retorna al activarse el token de apagado, después de
    /// esperar a los workers (como máximo `grace_period`).
    pub fn run(mut self) -> Result<(), ServerError> {
        tracing::info!(
            "Starting tinyhttpd server on port {}",
            self.context.footer.port
        );

        while !self.shutdown.is_cancelled() {
            match self.listener.accept() {
                Ok((stream, peer)) => self.dispatch(stream, peer),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL)
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => return Err(ServerError::Accept { source }),
            }

            self.workers.retain(|worker| !worker.is_finished());
        }

        tracing::info!("Exiting.");
        self.drain();
        Ok(())
    }

    /// Handshake (si aplica) y lanzamiento del worker
    fn dispatch(&mut self, stream: TcpStream, peer: SocketAddr) {
        tracing::debug!("Accepted connection from {}", peer);

        if let Err(e) = stream.set_nonblocking(false) {
            tracing::warn!("Dropping connection from {}: {}", peer, e);
            return;
        }

        let stream = match &self.tls {
            Some(acceptor) => match acceptor.accept(stream, &self.shutdown) {
                Ok(tls) => ClientStream::Tls(Box::new(tls)),
                Err(TlsError::Cancelled) => {
                    tracing::debug!("Dropping handshake with {}: shutting down", peer);
                    return;
                }
                Err(e) => {
                    tracing::warn!("SSL handshake with {} failed: {}", peer, e);
                    return;
                }
            },
            None => ClientStream::Plain(stream),
        };

        let context = Arc::clone(&self.context);
        let spawned = thread::Builder::new()
            .name(format!("conn-{}", peer))
            .spawn(move || {
                let mut stream = stream;
                let peer_ip = peer.ip().to_string();

                match handle_connection(&mut stream, &peer_ip, &context) {
                    Ok(()) => {}
                    Err(ConnectionError::Parse(e)) => {
                        tracing::debug!("Discarding request from {}: {}", peer, e)
                    }
                    Err(e) => tracing::warn!("Connection with {} failed: {}", peer, e),
                }

                stream.close();
            });

        match spawned {
            Ok(handle) => self.workers.push(handle),
            Err(e) => tracing::error!("Failed to spawn worker for {}: {}", peer, e),
        }
    }

    /// Espera a los workers en vuelo hasta `grace_period`; los que sigan
    /// corriendo después quedan desacoplados.
    fn drain(&mut self) {
        let deadline = Instant::now() + self.context.config.grace_period;

        while self.workers.iter().any(|w| !w.is_finished()) && Instant::now() < deadline {
            thread::sleep(ACCEPT_POLL_INTERVAL);
        }

        let (finished, pending): (Vec<_>, Vec<_>) =
            self.workers.drain(..).partition(|w| w.is_finished());

        for worker in finished {
            if worker.join().is_err() {
                tracing::warn!("A connection worker panicked");
            }
        }

        if !pending.is_empty() {
            tracing::warn!(
                "{} connection(s) still in flight after the grace period",
                pending.len()
            );
        }
    }
}
