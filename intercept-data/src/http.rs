//! Shared HTTP plumbing for the collaborator clients.
//!
//! The collaborator traits are synchronous so the selection pipeline stays
//! embeddable in synchronous callers. [`BlockingClient`] owns a `reqwest`
//! client and a current-thread Tokio runtime and bridges async requests to
//! those traits.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

/// Default user agent sent to collaborator services.
pub const DEFAULT_USER_AGENT: &str = "intercept-engine/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while constructing an HTTP client.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The base URL could not be parsed or cannot carry a path.
    #[error("invalid base URL '{url}': {message}")]
    InvalidUrl {
        /// URL as supplied.
        url: String,
        /// Parser message.
        message: String,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime")]
    Runtime(#[source] std::io::Error),
}

/// Connection settings common to the collaborator clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Base URL of the service, e.g. `"http://localhost:8989"`.
    pub base_url: String,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl HttpClientConfig {
    /// Configuration for `base_url` with the default timeout and user agent.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// `reqwest` client paired with a runtime for blocking calls.
///
/// From outside any runtime, or inside a `current_thread` runtime, requests
/// run on the owned runtime. Inside a multi-threaded runtime they run on the
/// caller's handle through [`tokio::task::block_in_place`].
pub(crate) struct BlockingClient {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
    pub(crate) timeout: Duration,
    runtime: Runtime,
}

impl std::fmt::Debug for BlockingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingClient")
            .field("client", &self.client)
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl BlockingClient {
    pub(crate) fn build(config: &HttpClientConfig) -> Result<Self, ClientBuildError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ClientBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientBuildError::Runtime)?;
        Ok(Self {
            client,
            base_url,
            timeout: config.timeout,
            runtime,
        })
    }

    /// Endpoint URL below the base path with the given query pairs.
    pub(crate) fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(path);
        }
        url.query_pairs_mut().extend_pairs(query);
        url
    }

    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }

    /// Describe a transport or status failure.
    pub(crate) fn describe(&self, error: &reqwest::Error) -> String {
        if error.is_timeout() {
            return format!("timed out after {}s", self.timeout.as_secs());
        }
        match error.status() {
            Some(status) => format!("HTTP {status}"),
            None => error.to_string(),
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ClientBuildError> {
    let invalid = |message: String| ClientBuildError::InvalidUrl {
        url: raw.to_owned(),
        message,
    };
    let url = Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot carry a path".to_owned()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:8989", "http://localhost:8989/isochrone?a=1&b=x+y")]
    #[case("http://localhost:8989/", "http://localhost:8989/isochrone?a=1&b=x+y")]
    #[case("https://maps.example/gh/", "https://maps.example/gh/isochrone?a=1&b=x+y")]
    fn endpoints_join_below_the_base_path(#[case] base: &str, #[case] expected: &str) {
        let client = BlockingClient::build(&HttpClientConfig::new(base)).expect("client builds");
        let url = client.endpoint("isochrone", &[("a", "1"), ("b", "x y")]);
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    #[case("not a url")]
    #[case("mailto:someone@example.org")]
    fn invalid_base_urls_are_rejected(#[case] base: &str) {
        let err = BlockingClient::build(&HttpClientConfig::new(base)).expect_err("invalid");
        assert!(matches!(err, ClientBuildError::InvalidUrl { .. }));
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpClientConfig::new("http://example.com")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }
}
