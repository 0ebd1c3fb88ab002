//! # Static Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada: parsea la configuración, instala el logging y el
//! handler de Ctrl-C, y corre el servidor hasta el shutdown.

use static_server::config::Config;
use static_server::server::Server;
use static_server::ServerResult;
use tracing_subscriber::FmtSubscriber;

fn main() {
    let config = Config::new();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.tracing_level())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("No se pudo instalar el logger: {}", e);
    }

    tracing::info!("=================================");
    tracing::info!("  Static File Server");
    tracing::info!("=================================");

    if let Err(e) = run(config) {
        tracing::error!("💥 Error fatal: {}", e);
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }
}

fn run(config: Config) -> ServerResult<()> {
    config.print_summary();

    let server = Server::bind(config)?;

    let shutdown = server.shutdown_handle();
    ctrlc::set_handler(move || {
        tracing::info!("Señal recibida, iniciando shutdown...");
        shutdown.trigger();
    })?;

    server.run()?;
    tracing::info!("Servidor detenido");
    Ok(())
}
