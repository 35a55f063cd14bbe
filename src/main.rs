//! # tinyhttpd - Entry Point
//! src/main.rs
//!
//! Parsea la CLI, instala logging y señales, y corre el servidor hasta
//! que llegue SIGINT/SIGTERM.

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use std::process;
use tinyhttpd::config::{normalize_args, Cli};
use tinyhttpd::logging;
use tinyhttpd::server::shutdown::install_signal_handlers;
use tinyhttpd::server::{Server, ShutdownToken};

fn main() {
    let cli = match Cli::try_parse_from(normalize_args(std::env::args())) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    };

    if let Err(e) = run(cli) {
        eprintln!("tinyhttpd: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.into_config().context("invalid configuration")?;

    logging::init(config.debug)?;
    config.log_summary();

    let shutdown = ShutdownToken::new();
    install_signal_handlers(&shutdown).context("failed to install signal handlers")?;

    let server = Server::bind(config, shutdown).context("failed to start server")?;
    server.run().context("server stopped unexpectedly")?;

    Ok(())
}
