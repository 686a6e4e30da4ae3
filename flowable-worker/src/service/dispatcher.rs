//! Job dispatcher
//!
//! Feeds the jobs of one acquired batch to the handler, strictly one after
//! another, and reduces every verdict to its terminal action. A job that
//! cannot be processed never aborts the rest of the batch.

use flowable_client::ExternalWorkerClient;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::handler::JobHandler;
use crate::service::reducer::{Disposition, reduce};

/// Status handed to the handler when a job or batch could not be read
pub const SYNTHETIC_FAILURE_STATUS: u16 = 500;

/// Identifier of a job document
///
/// Checks, in order, a non-empty string `id`, a non-empty string `jobId` and a
/// numeric `id` (printed without decimals). Returns an empty string when none
/// is present.
pub fn extract_job_id(job: &Value) -> String {
    let id = job.get("id");

    if let Some(id) = id.and_then(Value::as_str).filter(|s| !s.is_empty()) {
        return id.to_string();
    }

    if let Some(id) = job
        .get("jobId")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
    {
        return id.to_string();
    }

    if let Some(id) = id.and_then(Value::as_f64) {
        return format!("{:.0}", id);
    }

    String::new()
}

/// Hands jobs to a handler and posts the resulting actions
#[derive(Clone)]
pub struct JobDispatcher {
    client: ExternalWorkerClient,
    handler: Arc<dyn JobHandler>,
    worker_id: String,
}

impl JobDispatcher {
    pub fn new(
        client: ExternalWorkerClient,
        handler: Arc<dyn JobHandler>,
        worker_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            handler,
            worker_id: worker_id.into(),
        }
    }

    /// Dispatches every job of a batch in order
    ///
    /// `status` is the HTTP status of the acquire response. Returns one
    /// disposition per job.
    pub async fn dispatch_batch(&self, status: u16, jobs: &[Value]) -> Vec<Disposition> {
        let mut dispositions = Vec::with_capacity(jobs.len());

        for job in jobs {
            dispositions.push(self.dispatch(status, job).await);
        }

        dispositions
    }

    /// Dispatches a single job
    pub async fn dispatch(&self, status: u16, job: &Value) -> Disposition {
        let body = match serde_json::to_string(job) {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to serialize job, reporting failure: {}", e);
                return self.report_failure().await;
            }
        };

        let job_id = extract_job_id(job);
        if job_id.is_empty() {
            warn!("Job has no identifier, no terminal action will be posted");
        }

        debug!(job_id = %job_id, "Dispatching job to handler");

        let (verdict, result) = self.handler.translate(status, &body).await;
        reduce(&self.client, &self.worker_id, &job_id, verdict, result).await
    }

    /// Lets the handler observe a failure that has no job attached
    ///
    /// The handler is invoked with a synthetic `500` and an empty body. Its
    /// verdict is reduced without a job id and therefore never posted.
    pub async fn report_failure(&self) -> Disposition {
        let (verdict, result) = self
            .handler
            .translate(SYNTHETIC_FAILURE_STATUS, "")
            .await;
        reduce(&self.client, &self.worker_id, "", verdict, result).await
    }
}
