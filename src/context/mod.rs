//! Server and worker contexts
//!
//! `ServerContext` is created once at startup and shared read-only by every
//! worker: configuration, clock, view renderer and the optional custom
//! not-found page. Each worker thread owns a `WorkerContext` holding its own
//! lazily built not-found page.

mod worker;

pub use worker::{WorkerContext, WorkerRegistry};

use std::sync::Arc;

use crate::config::Config;
use crate::http::date::{Clock, SystemClock};
use crate::http::response::{HttpResponse, HttpResponsePtr};
use crate::view::{BuiltinViews, ViewRenderer};

pub struct ServerContext {
    config: Arc<Config>,
    clock: Arc<dyn Clock>,
    views: Arc<dyn ViewRenderer>,
    custom_not_found: Option<HttpResponsePtr>,
    server_header: String,
}

impl ServerContext {
    pub fn new(config: Config) -> Self {
        let server_header = config.server_header_line();
        Self {
            config: Arc::new(config),
            clock: Arc::new(SystemClock),
            views: Arc::new(BuiltinViews),
            custom_not_found: None,
            server_header,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_view_renderer(mut self, views: Arc<dyn ViewRenderer>) -> Self {
        self.views = views;
        self
    }

    /// Application-provided not-found page, shared by all workers
    #[must_use]
    pub fn with_custom_not_found(mut self, page: HttpResponse) -> Self {
        self.custom_not_found = Some(Arc::new(page));
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn views(&self) -> &dyn ViewRenderer {
        self.views.as_ref()
    }

    pub const fn custom_not_found(&self) -> Option<&HttpResponsePtr> {
        self.custom_not_found.as_ref()
    }

    pub fn server_header_line(&self) -> &str {
        &self.server_header
    }
}

impl std::fmt::Debug for ServerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerContext")
            .field("config", &self.config)
            .field("custom_not_found", &self.custom_not_found.is_some())
            .finish_non_exhaustive()
    }
}

/// Who is asking for a response: a worker thread or anything else
#[derive(Debug, Clone, Copy)]
pub enum CallContext<'a> {
    Worker(&'a WorkerContext),
    External(&'a ServerContext),
}

impl<'a> CallContext<'a> {
    pub fn server(self) -> &'a ServerContext {
        match self {
            Self::Worker(worker) => worker.server(),
            Self::External(server) => server,
        }
    }

    /// The worker, if it is one of the configured worker threads
    pub fn worker(self) -> Option<&'a WorkerContext> {
        match self {
            Self::Worker(worker) if worker.is_worker() => Some(worker),
            _ => None,
        }
    }
}

impl<'a> From<&'a WorkerContext> for CallContext<'a> {
    fn from(worker: &'a WorkerContext) -> Self {
        Self::Worker(worker)
    }
}

impl<'a> From<&'a ServerContext> for CallContext<'a> {
    fn from(server: &'a ServerContext) -> Self {
        Self::External(server)
    }
}
