//! Flowable External Worker Client
//!
//! A small, type-safe client for the engine's external job REST API.
//!
//! The client covers acquiring jobs for a topic, listing jobs, and the four
//! terminal actions a worker can take on an acquired job (complete, fail,
//! BPMN error, CMMN terminate). Network access goes through the
//! [`Transport`] trait so the same client runs against reqwest in production
//! and an in-memory transport in tests.
//!
//! # Example
//!
//! ```no_run
//! use flowable_client::{ExternalWorkerClient, TransportConfig};
//! use flowable_core::dto::job::{AcquireRequest, ScopeType};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ExternalWorkerClient::http(
//!         "http://localhost:8090",
//!         TransportConfig::new().with_basic_auth("admin", "test"),
//!     );
//!
//!     let acquired = client.acquire_jobs(&AcquireRequest {
//!         topic: "testing".to_string(),
//!         lock_duration: "PT10M".to_string(),
//!         number_of_tasks: 1,
//!         number_of_retries: 5,
//!         worker_id: "worker1".to_string(),
//!         scope_type: ScopeType::Bpmn,
//!     }).await?;
//!
//!     println!("Acquired {} job(s)", acquired.jobs.len());
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
pub mod transport;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use jobs::AcquiredJobs;
pub use transport::{Auth, HttpTransport, RawResponse, Transport, TransportConfig};

use std::fmt;
use std::sync::Arc;

/// Path prefix of the external job REST API
const JOB_API: &str = "/external-job-api";

/// Client for the external job REST API
///
/// Cheap to clone; clones share the underlying transport.
#[derive(Clone)]
pub struct ExternalWorkerClient {
    /// Base URL of the engine without trailing slashes (e.g., "http://localhost:8090")
    base_url: String,
    /// Network capability used for every request
    transport: Arc<dyn Transport>,
}

impl ExternalWorkerClient {
    /// Create a new client over the given transport
    ///
    /// Trailing slashes are stripped from `base_url`.
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// Create a new client backed by reqwest
    ///
    /// # Example
    /// ```
    /// use flowable_client::{ExternalWorkerClient, TransportConfig};
    ///
    /// let client = ExternalWorkerClient::http("http://localhost:8090/", TransportConfig::new());
    /// assert_eq!(client.base_url(), "http://localhost:8090");
    /// ```
    pub fn http(base_url: impl Into<String>, config: TransportConfig) -> Self {
        Self::new(base_url, Arc::new(HttpTransport::new(config)))
    }

    /// Get the normalized base URL of the engine
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of an external job API path
    fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, JOB_API, path)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Turn a non-2xx response into an API error
    fn check_status(response: RawResponse) -> Result<RawResponse> {
        if !response.is_success() {
            return Err(ClientError::api_error(response.status, response.body));
        }

        Ok(response)
    }
}

impl fmt::Debug for ExternalWorkerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalWorkerClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
