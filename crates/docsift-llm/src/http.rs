//! Shared HTTP client construction for consistent timeout and TLS configuration.

use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Create an HTTP client for generative calls.
///
/// Config: 30s connect timeout, `request_timeout` overall timeout, rustls TLS,
/// `docsift/{version}` user-agent, redirect limit 10.
///
/// # Panics
///
/// Panics if the TLS backend cannot be initialized (should never happen with rustls).
#[must_use]
pub fn default_client(request_timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(request_timeout)
        .user_agent(concat!("docsift/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .expect("default HTTP client construction must not fail")
}
