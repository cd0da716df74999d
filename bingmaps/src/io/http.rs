use std::time::Duration;

pub use reqwest::header::HeaderValue;

/// Controls how the metadata is fetched.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// User agent to be sent to the metadata service.
    ///
    /// This should be set only on native targets. The browser sets its own user agent on wasm
    /// targets.
    pub user_agent: Option<HeaderValue>,

    /// Give up on the metadata after this long. The source then ends up in the error state.
    /// Without a timeout, a request which never completes keeps the source loading forever.
    ///
    /// Ignored in WASM.
    pub timeout: Option<Duration>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        let user_agent = Some(HeaderValue::from_static(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION"),
        )));

        #[cfg(target_arch = "wasm32")]
        let user_agent = None;

        Self {
            user_agent,
            timeout: None,
        }
    }
}
