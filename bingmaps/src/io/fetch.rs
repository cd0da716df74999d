//! Getting the bytes of the imagery metadata.

use bytes::Bytes;
use reqwest::header::USER_AGENT;

use super::http::{HeaderValue, HttpOptions};

/// Source of the metadata, HTTP in production, something canned in tests.
pub trait Fetch {
    type Error: std::error::Error + Sync + Send;

    #[cfg(target_arch = "wasm32")]
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Bytes, Self::Error>>;

    #[cfg(not(target_arch = "wasm32"))]
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Bytes, Self::Error>> + Send;
}

/// [`Fetch`] using HTTP.
pub struct HttpFetch {
    client: reqwest::Client,
    user_agent: Option<HeaderValue>,
}

impl HttpFetch {
    pub fn new(http_options: &HttpOptions) -> Self {
        Self {
            // Keep outside the request to reuse it as much as possible.
            client: reqwest::Client::new(),
            user_agent: http_options.user_agent.clone(),
        }
    }
}

impl Fetch for HttpFetch {
    type Error = reqwest::Error;

    async fn fetch(&self, url: &str) -> Result<Bytes, Self::Error> {
        let mut request = self.client.get(url);

        if let Some(user_agent) = &self.user_agent {
            request = request.header(USER_AGENT, user_agent.clone());
        }

        let response = request.send().await?;
        log::debug!("Metadata response: {:?}.", response.status());

        // Body is returned even for error statuses, as it carries its own status code.
        response.bytes().await
    }
}
