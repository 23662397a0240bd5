//! HTTP transport for the bridge. The bridge only ever issues a JSON `POST`
//! and looks at the status and, for login, the body; everything else
//! (client construction, timeouts, error mapping) stays behind `Transport`.

use crate::errors::BridgeError;

/// Status and body of one backend response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for any 2xx status.
    #[must_use]
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one JSON body to one URL.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// `POST` `body` to `url` with `Content-Type: application/json`.
    ///
    /// # Errors
    /// Returns `BridgeError::Network` or `BridgeError::Timeout` when no
    /// response arrives. Any HTTP status, including 4xx/5xx, is `Ok`.
    async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse, BridgeError>;
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::HttpTransport;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::{HttpResponse, Transport};
    use crate::{errors::BridgeError, APP_USER_AGENT};
    use reqwest::header::CONTENT_TYPE;
    use std::time::Duration;
    use tracing::debug;

    const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// `reqwest`-backed transport with connect and request timeouts.
    #[derive(Clone, Debug)]
    pub struct HttpTransport {
        client: reqwest::Client,
    }

    impl HttpTransport {
        /// # Errors
        /// Returns `BridgeError::Config` if the HTTP client cannot be constructed.
        pub fn new(timeout: Duration) -> Result<Self, BridgeError> {
            let client = reqwest::Client::builder()
                .user_agent(APP_USER_AGENT)
                .connect_timeout(CONNECT_TIMEOUT.min(timeout))
                .timeout(timeout)
                .build()
                .map_err(|err| BridgeError::Config(format!("failed to build HTTP client: {err}")))?;
            Ok(Self { client })
        }
    }

    impl Transport for HttpTransport {
        async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse, BridgeError> {
            let response = self
                .client
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await
                .map_err(map_request_error)?;

            let status = response.status().as_u16();
            // the status alone decides signup; a truncated body only matters to login parsing
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    debug!(status, "failed to read response body: {err}");
                    String::new()
                }
            };

            Ok(HttpResponse { status, body })
        }
    }

    fn map_request_error(err: reqwest::Error) -> BridgeError {
        if err.is_timeout() {
            BridgeError::Timeout("Request timed out. Please try again.".to_string())
        } else if err.is_builder() {
            BridgeError::Serialization(format!("Failed to build request: {err}"))
        } else {
            BridgeError::Network(format!("Unable to reach the server: {err}"))
        }
    }
}
