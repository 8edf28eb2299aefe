// Worker context module
// Per-worker state: identity and the worker's own cached not-found page

use std::sync::{Arc, OnceLock};

use super::ServerContext;
use crate::http::builders;
use crate::http::response::HttpResponsePtr;

#[derive(Debug)]
pub struct WorkerContext {
    index: usize,
    server: Arc<ServerContext>,
    not_found: OnceLock<HttpResponsePtr>,
}

impl WorkerContext {
    pub const fn new(index: usize, server: Arc<ServerContext>) -> Self {
        Self {
            index,
            server,
            not_found: OnceLock::new(),
        }
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    pub fn server(&self) -> &ServerContext {
        &self.server
    }

    /// Whether this index belongs to one of the configured worker threads
    pub fn is_worker(&self) -> bool {
        self.index < self.server.config().thread_num()
    }

    /// This worker's not-found page, built on first use
    pub(crate) fn cached_not_found(&self) -> &HttpResponsePtr {
        self.not_found
            .get_or_init(|| Arc::new(builders::build_cacheable_not_found(&self.server)))
    }
}

/// One `WorkerContext` per configured worker thread
#[derive(Debug)]
pub struct WorkerRegistry {
    workers: Vec<Arc<WorkerContext>>,
}

impl WorkerRegistry {
    pub fn new(server: &Arc<ServerContext>) -> Self {
        let workers = (0..server.config().thread_num())
            .map(|index| Arc::new(WorkerContext::new(index, Arc::clone(server))))
            .collect();
        Self { workers }
    }

    pub fn get(&self, index: usize) -> Option<&Arc<WorkerContext>> {
        self.workers.get(index)
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<WorkerContext>> {
        self.workers.iter()
    }
}
