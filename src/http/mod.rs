//! HTTP protocol layer module
//!
//! Response object model, wire serialization, cookies, dates and the
//! snapshot cache for responses reused across many requests.

pub mod body;
pub mod builders;
pub mod cookie;
pub mod date;
pub mod headers;
pub mod mime;
pub mod render_cache;
pub mod response;
pub mod serializer;
pub mod status;

// Re-export commonly used types
pub use body::Body;
pub use builders::{
    build_default_response, build_file_response, build_json_response, build_json_response_from,
    build_not_found_response, build_redirect_response, build_redirect_response_with_code,
    build_view_response,
};
pub use cookie::Cookie;
pub use date::{Clock, ManualClock, SystemClock};
pub use mime::ContentType;
pub use render_cache::CacheState;
pub use response::{HttpResponse, HttpResponsePtr};
pub use status::{StatusCode, Version};
