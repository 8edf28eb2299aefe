//! # rust_http_response
//!
//! HTTP/1.x response object model and wire rendering:
//! - Responses built directly, from files, views, JSON payloads or redirects
//! - Header blocks cached until the next mutation
//! - Cacheable responses rendered once and reused, with only the `Date`
//!   field rewritten (into a fresh copy) when the second changes
//! - One lazily built not-found page per worker thread
//!
//! ```text
//!  builders ──▶ HttpResponse ──render()──▶ head + cookies + Date + body
//!                   │                            ▲
//!                   │ cacheable                  │ patch Date in a copy
//!                   ▼                            │
//!              RenderCache (snapshot) ───────────┘
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod logger;
pub mod view;

pub use config::Config;
pub use context::{CallContext, ServerContext, WorkerContext, WorkerRegistry};
pub use error::{ResponseError, Result};
pub use http::{HttpResponse, HttpResponsePtr};
