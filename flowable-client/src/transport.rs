//! HTTP transport
//!
//! The client only needs two primitives from the network: a GET and a POST of
//! a JSON body, each returning the status code and raw body. [`Transport`]
//! captures that seam; [`HttpTransport`] implements it with reqwest and applies
//! the configured default headers and credentials to every request.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::Result;

/// Status code and raw body of an HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal network capability required by the external worker client
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs a GET request against a full URL
    async fn get(&self, url: &str) -> Result<RawResponse>;

    /// Performs a POST request against a full URL with a JSON payload
    async fn post(&self, url: &str, body: Vec<u8>) -> Result<RawResponse>;
}

/// Credentials attached to every request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    Basic { user: String, password: String },
    Bearer(String),
}

/// Connection settings for [`HttpTransport`]
///
/// Built once before any subscription starts and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Credentials, if the engine requires authentication
    pub auth: Option<Auth>,
    /// Headers sent with every request
    pub default_headers: BTreeMap<String, String>,
}

impl TransportConfig {
    pub fn new() -> Self {
        let mut default_headers = BTreeMap::new();
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());

        Self {
            auth: None,
            default_headers,
        }
    }

    /// Uses HTTP basic authentication
    pub fn with_basic_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(Auth::Basic {
            user: user.into(),
            password: password.into(),
        });
        self
    }

    /// Uses a bearer token
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(Auth::Bearer(token.into()));
        self
    }

    /// Sets or overrides a default header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// reqwest-backed [`Transport`]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: TransportConfig,
}

impl HttpTransport {
    /// Creates a transport with a default reqwest client
    pub fn new(config: TransportConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Creates a transport with a custom reqwest client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use flowable_client::{HttpTransport, TransportConfig};
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let transport = HttpTransport::with_client(
    ///     http_client,
    ///     TransportConfig::new().with_basic_auth("admin", "test"),
    /// );
    /// ```
    pub fn with_client(client: Client, config: TransportConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Applies default headers and credentials to a request
    fn prepare(&self, mut request: RequestBuilder) -> RequestBuilder {
        for (key, value) in &self.config.default_headers {
            request = request.header(key.as_str(), value.as_str());
        }

        match &self.config.auth {
            Some(Auth::Basic { user, password }) => request.basic_auth(user, Some(password)),
            Some(Auth::Bearer(token)) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<RawResponse> {
        let response = self.prepare(request).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<RawResponse> {
        debug!(url, "GET");
        self.send(self.client.get(url)).await
    }

    async fn post(&self, url: &str, body: Vec<u8>) -> Result<RawResponse> {
        debug!(url, bytes = body.len(), "POST");
        self.send(self.client.post(url).body(body)).await
    }
}
