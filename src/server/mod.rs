// Server module entry point
// One OS thread per worker, each with its own single-threaded reactor

pub mod connection;
pub mod listener;

pub use listener::create_reusable_listener;

use std::net::SocketAddr;
use std::sync::Arc;

use rust_http_response::{logger, WorkerContext};
use tokio::net::TcpListener;

/// Run one worker until its listener fails
pub fn run_worker(addr: SocketAddr, worker: Arc<WorkerContext>) -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = tokio::task::LocalSet::new();
    local.block_on(&runtime, async move {
        let listener = create_reusable_listener(addr)?;
        logger::log_worker_started(worker.index());
        accept_loop(listener, worker).await
    })
}

async fn accept_loop(listener: TcpListener, worker: Arc<WorkerContext>) -> std::io::Result<()> {
    loop {
        match listener.accept().await {
            Ok((stream, _peer)) => {
                let worker = Arc::clone(&worker);
                tokio::task::spawn_local(async move {
                    if let Err(e) = connection::serve(stream, &worker).await {
                        logger::log_connection_error(&e);
                    }
                });
            }
            Err(e) => logger::log_connection_error(&e),
        }
    }
}
