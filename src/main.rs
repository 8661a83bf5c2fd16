use anyhow::Result;
use axum_server::Handle;
use httputil::{configuration::Config, logger::setup_logger, server::Server};
use std::{net::SocketAddr, time::Duration};
use tokio::signal;
use tracing::info;

pub const CONFIG_FILE: &str = "httputil.yaml";

fn main() -> Result<()> {
    // We need to work out the local time offset before entering multi-threaded context
    let cfg: Config = match std::fs::File::open(CONFIG_FILE) {
        Ok(file) => serde_yaml_ng::from_reader(file)?,
        Err(_) => Config::default(),
    };
    let _log_guards = setup_logger(cfg.debug_mode, cfg.log_to_file);
    run()
}

#[tokio::main]
async fn run() -> Result<()> {
    let server = Server::build(CONFIG_FILE).await?;

    let handle = Handle::new();
    let shutdown_handle = handle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutting down...");
        shutdown_handle.graceful_shutdown(Some(Duration::from_secs(10)));
    });

    let addr = SocketAddr::from((std::net::Ipv6Addr::UNSPECIFIED, server.port));
    info!("Starting server on {addr}...");
    axum_server::bind(addr)
        .handle(handle)
        .serve(server.router.into_make_service())
        .await?;

    info!("Graceful shutdown done !");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
