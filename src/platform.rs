//! # Descripción del sistema
//! src/platform.rs
//!
//! Texto del host que aparece en el footer de los listados.

use std::fs;

const OS_RELEASE: &str = "/etc/os-release";

/// `PRETTY_NAME` de `/etc/os-release`, o el nombre del OS si no existe
pub fn os_description() -> String {
    fs::read_to_string(OS_RELEASE)
        .ok()
        .and_then(|contents| pretty_name(&contents))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| std::env::consts::OS.to_string())
}

/// Extrae `PRETTY_NAME` sin comillas
fn pretty_name(os_release: &str) -> Option<String> {
    os_release
        .lines()
        .find_map(|line| line.strip_prefix("PRETTY_NAME="))
        .map(|value| value.replace('"', ""))
}
