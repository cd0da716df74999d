mod fetch;
mod http;
pub(crate) mod runtime;

pub use fetch::{Fetch, HttpFetch};
pub use http::{HeaderValue, HttpOptions};
