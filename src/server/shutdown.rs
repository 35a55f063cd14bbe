//! # Apagado del servidor
//! src/server/shutdown.rs
//!
//! Token de cancelación que el accept loop consulta en cada vuelta.
//! SIGINT y SIGTERM lo activan a través de [`install_signal_handlers`].

use nix::libc::c_int;
use nix::sys::signal::{signal, SigHandler, Signal};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Flag compartido: `false` mientras el servidor deba seguir aceptando
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    flag: Arc<AtomicBool>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pide el apagado. Idempotente.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Token que activan las señales; solo se registra el primero
static SIGNAL_TOKEN: OnceLock<ShutdownToken> = OnceLock::new();

extern "C" fn request_shutdown(_signal: c_int) {
    if let Some(token) = SIGNAL_TOKEN.get() {
        token.cancel();
    }
}

/// Conecta SIGINT y SIGTERM con `token`
pub fn install_signal_handlers(token: &ShutdownToken) -> nix::Result<()> {
    let _ = SIGNAL_TOKEN.set(token.clone());

    // SAFETY: el handler solo hace un load del OnceLock y un store atómico
    unsafe {
        signal(Signal::SIGINT, SigHandler::Handler(request_shutdown))?;
        signal(Signal::SIGTERM, SigHandler::Handler(request_shutdown))?;
    }

    Ok(())
}
