//! Job-related API endpoints

use flowable_core::dto::job::{AcquireRequest, CompleteJob, JobFailure};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::ExternalWorkerClient;
use crate::error::{ClientError, Result};
use crate::transport::RawResponse;

/// Jobs returned by a successful acquire call
#[derive(Debug, Clone, PartialEq)]
pub struct AcquiredJobs {
    /// HTTP status of the acquire response
    pub status: u16,
    /// Job documents in the order the engine returned them
    pub jobs: Vec<Value>,
}

impl ExternalWorkerClient {
    // =============================================================================
    // Acquisition
    // =============================================================================

    /// Acquire jobs for a topic
    ///
    /// A transport failure, a non-2xx status and a body that is not a JSON
    /// array all surface as an error.
    ///
    /// # Arguments
    /// * `req` - The acquire parameters, sent as the request body
    ///
    /// # Returns
    /// The acquired job documents, unmodified
    pub async fn acquire_jobs(&self, req: &AcquireRequest) -> Result<AcquiredJobs> {
        let url = self.api_url("/acquire/jobs");
        let payload = serde_json::to_vec(req)?;
        let response = Self::check_status(self.transport.post(&url, payload).await?)?;

        let jobs: Vec<Value> = serde_json::from_str(&response.body).map_err(|e| {
            ClientError::ParseError(format!("acquire response is not a JSON array: {}", e))
        })?;

        debug!(topic = %req.topic, count = jobs.len(), "Acquired jobs");

        Ok(AcquiredJobs {
            status: response.status,
            jobs,
        })
    }

    /// List jobs
    ///
    /// The body is returned untouched and the status is not checked; callers
    /// interpret the response themselves.
    pub async fn list_jobs(&self) -> Result<RawResponse> {
        let url = self.api_url("/jobs");
        self.transport.get(&url).await
    }

    // =============================================================================
    // Terminal Actions
    // =============================================================================

    /// Complete an acquired job with output variables
    pub async fn complete_job(&self, job_id: &str, body: &CompleteJob) -> Result<RawResponse> {
        self.post_action(job_id, "complete", body).await
    }

    /// Fail an acquired job
    pub async fn fail_job(&self, job_id: &str, body: &JobFailure) -> Result<RawResponse> {
        self.post_action(job_id, "fail", body).await
    }

    /// Throw a BPMN error for an acquired job
    pub async fn bpmn_error(&self, job_id: &str, body: &JobFailure) -> Result<RawResponse> {
        self.post_action(job_id, "bpmnError", body).await
    }

    /// Terminate the CMMN plan item of an acquired job
    pub async fn cmmn_terminate(&self, job_id: &str, body: &JobFailure) -> Result<RawResponse> {
        self.post_action(job_id, "cmmnTerminate", body).await
    }

    async fn post_action<B: Serialize>(
        &self,
        job_id: &str,
        action: &str,
        body: &B,
    ) -> Result<RawResponse> {
        if job_id.is_empty() {
            return Err(ClientError::InvalidRequest(format!(
                "{}: missing job id",
                action
            )));
        }

        let url = self.api_url(&format!("/acquire/jobs/{}/{}", job_id, action));
        let payload = serde_json::to_vec(body)?;
        let response = self.transport.post(&url, payload).await?;

        Self::check_status(response)
    }
}
