use std::sync::Arc;
use std::thread;

use rust_http_response::{logger, Config, ServerContext, WorkerRegistry};

mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg.logging)?;

    let addr = cfg.get_socket_addr()?;
    let server = Arc::new(ServerContext::new(cfg));
    let registry = WorkerRegistry::new(&server);
    logger::log_server_start(&addr, server.config());

    // One OS thread per worker, each owning its context and reactor
    let handles = registry
        .iter()
        .map(|worker| {
            let worker = Arc::clone(worker);
            thread::Builder::new()
                .name(format!("worker-{}", worker.index()))
                .spawn(move || server::run_worker(addr, worker))
        })
        .collect::<Result<Vec<_>, _>>()?;

    for handle in handles {
        match handle.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => logger::log_worker_failed(&e),
            Err(_) => logger::log_warning("worker thread panicked"),
        }
    }
    Ok(())
}
