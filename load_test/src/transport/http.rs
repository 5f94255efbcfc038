//! reqwest-backed transport

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;

use super::{RawResponse, RequestError, Transport};
use crate::error::ConfigError;

/// Client-level settings shared by every virtual user.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Verify the target's TLS certificate chain
    pub verify_tls: bool,
    /// Upper bound for a whole request, body included
    pub timeout: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            verify_tls: false,
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP transport bound to one target host.
///
/// Cloning is cheap: `reqwest::Client` is reference counted, so every virtual
/// user shares the same connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base: Url,
}

impl HttpTransport {
    pub fn new(base: Url, options: &HttpOptions) -> Result<Self, ConfigError> {
        if !options.verify_tls {
            tracing::warn!("TLS certificate verification is disabled for {}", base);
        }

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!options.verify_tls)
            .timeout(options.timeout)
            .user_agent(concat!("login-load-test/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            client,
            base: with_trailing_slash(base),
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Append `path` to the host, keeping any path prefix the host carries
    /// (`http://gw/svc` + `/api/login-attempt` is `http://gw/svc/api/login-attempt`).
    pub fn url_for(&self, path: &str) -> Result<Url, RequestError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|source| RequestError::InvalidPath {
                path: path.to_string(),
                source,
            })
    }
}

/// `Url::join` replaces the last segment unless the base ends in `/`.
fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        path: &str,
        body: &Value,
        headers: &[(&str, &str)],
    ) -> Result<RawResponse, RequestError> {
        let url = self.url_for(path)?;

        let mut request = self.client.post(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        // json() only sets Content-Type when the caller has not
        let response = request.json(body).send().await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}
