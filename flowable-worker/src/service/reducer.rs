//! Result reducer
//!
//! Maps a handler verdict to one of the four terminal actions:
//!
//! | status        | default error code | action          |
//! |---------------|--------------------|-----------------|
//! | success       | none               | `complete`      |
//! | fail          | `failed`           | `fail`          |
//! | bpmnError     | `bpmnError`        | `bpmnError`     |
//! | cmmnTerminate | `cmmnTerminate`    | `cmmnTerminate` |
//!
//! Default error codes never replace one set by the handler. Unknown statuses
//! and jobs without an identifier produce no action.

use flowable_client::ExternalWorkerClient;
use flowable_core::dto::job::{CompleteJob, JobFailure};
use flowable_core::{HandlerResult, HandlerStatus};
use tracing::{error, info, warn};

/// Terminal action to post for one job
#[derive(Debug, Clone, PartialEq)]
pub enum TerminalAction {
    Complete { job_id: String, body: CompleteJob },
    Fail { job_id: String, body: JobFailure },
    BpmnError { job_id: String, body: JobFailure },
    CmmnTerminate { job_id: String, body: JobFailure },
}

impl TerminalAction {
    pub fn job_id(&self) -> &str {
        match self {
            TerminalAction::Complete { job_id, .. }
            | TerminalAction::Fail { job_id, .. }
            | TerminalAction::BpmnError { job_id, .. }
            | TerminalAction::CmmnTerminate { job_id, .. } => job_id,
        }
    }

    /// Action path segment
    pub fn name(&self) -> &'static str {
        match self {
            TerminalAction::Complete { .. } => "complete",
            TerminalAction::Fail { .. } => "fail",
            TerminalAction::BpmnError { .. } => "bpmnError",
            TerminalAction::CmmnTerminate { .. } => "cmmnTerminate",
        }
    }
}

/// What happened to a job after its verdict was reduced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// No action was due (unknown status or missing job id)
    Skipped,
    /// The terminal action was accepted by the engine
    Posted,
    /// The terminal action failed and was dropped
    PostFailed,
}

/// Decides the terminal action for a verdict without touching the network
///
/// A missing result is replaced by an empty one, and an empty worker id is
/// filled in from `worker_id`.
pub fn plan_action(
    worker_id: &str,
    job_id: &str,
    status: HandlerStatus,
    result: Option<HandlerResult>,
) -> Option<TerminalAction> {
    let mut result = result.unwrap_or_else(|| HandlerResult::new(status));
    if result.worker_id.is_empty() {
        result.worker_id = worker_id.to_string();
    }

    let default_code = match status {
        HandlerStatus::Success => "",
        HandlerStatus::Fail => "failed",
        HandlerStatus::BpmnError => "bpmnError",
        HandlerStatus::CmmnTerminate => "cmmnTerminate",
        HandlerStatus::Unknown => {
            warn!(job_id, "Unhandled handler status, no action taken");
            return None;
        }
    };

    if job_id.is_empty() {
        warn!(%status, "Missing job id, skipping terminal action");
        return None;
    }

    let job_id = job_id.to_string();

    if status == HandlerStatus::Success {
        return Some(TerminalAction::Complete {
            job_id,
            body: CompleteJob {
                worker_id: result.worker_id,
                variables: result.variables,
            },
        });
    }

    if result.error_code.is_empty() {
        result.error_code = default_code.to_string();
    }

    let body = JobFailure {
        worker_id: result.worker_id,
        variables: result.variables,
        error_code: result.error_code,
    };

    match status {
        HandlerStatus::BpmnError => Some(TerminalAction::BpmnError { job_id, body }),
        HandlerStatus::CmmnTerminate => Some(TerminalAction::CmmnTerminate { job_id, body }),
        _ => Some(TerminalAction::Fail { job_id, body }),
    }
}

/// Posts a terminal action; failures are logged and swallowed
pub async fn apply_action(client: &ExternalWorkerClient, action: &TerminalAction) -> Disposition {
    let response = match action {
        TerminalAction::Complete { job_id, body } => client.complete_job(job_id, body).await,
        TerminalAction::Fail { job_id, body } => client.fail_job(job_id, body).await,
        TerminalAction::BpmnError { job_id, body } => client.bpmn_error(job_id, body).await,
        TerminalAction::CmmnTerminate { job_id, body } => client.cmmn_terminate(job_id, body).await,
    };

    match response {
        Ok(response) => {
            info!(
                job_id = action.job_id(),
                action = action.name(),
                status = response.status,
                "Terminal action posted"
            );
            Disposition::Posted
        }
        Err(e) => {
            error!(
                job_id = action.job_id(),
                action = action.name(),
                "Failed to post terminal action: {:#}",
                e
            );
            Disposition::PostFailed
        }
    }
}

/// Plans and posts the terminal action for one verdict
pub async fn reduce(
    client: &ExternalWorkerClient,
    worker_id: &str,
    job_id: &str,
    status: HandlerStatus,
    result: Option<HandlerResult>,
) -> Disposition {
    match plan_action(worker_id, job_id, status, result) {
        Some(action) => apply_action(client, &action).await,
        None => Disposition::Skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowable_client::testing::{MockTransport, Reply};
    use flowable_core::HandlerVariable;
    use serde_json::json;

    fn client(transport: &std::sync::Arc<MockTransport>) -> ExternalWorkerClient {
        ExternalWorkerClient::new("http://engine:8090", transport.clone())
    }

    #[test]
    fn test_success_has_no_error_code() {
        let action = plan_action(
            "worker-1",
            "job-1",
            HandlerStatus::Success,
            Some(HandlerResult::success(vec![HandlerVariable::new("a", "string", "x")])),
        )
        .unwrap();

        assert_eq!(
            action,
            TerminalAction::Complete {
                job_id: "job-1".to_string(),
                body: CompleteJob {
                    worker_id: "worker-1".to_string(),
                    variables: vec![HandlerVariable::new("a", "string", "x")],
                },
            }
        );
    }

    #[test]
    fn test_default_error_codes() {
        let cases = [
            (HandlerStatus::Fail, "fail", "failed"),
            (HandlerStatus::BpmnError, "bpmnError", "bpmnError"),
            (HandlerStatus::CmmnTerminate, "cmmnTerminate", "cmmnTerminate"),
        ];

        for (status, action_name, code) in cases {
            let action = plan_action("w", "1", status, Some(HandlerResult::new(status))).unwrap();
            assert_eq!(action.name(), action_name);
            match action {
                TerminalAction::Fail { body, .. }
                | TerminalAction::BpmnError { body, .. }
                | TerminalAction::CmmnTerminate { body, .. } => assert_eq!(body.error_code, code),
                TerminalAction::Complete { .. } => panic!("unexpected complete"),
            }
        }
    }

    #[test]
    fn test_caller_error_code_kept() {
        let mut result = HandlerResult::new(HandlerStatus::BpmnError);
        result.error_code = "E1".to_string();

        let action = plan_action("w", "1", HandlerStatus::BpmnError, Some(result)).unwrap();
        match action {
            TerminalAction::BpmnError { body, .. } => assert_eq!(body.error_code, "E1"),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_missing_result_synthesized() {
        let action = plan_action("worker-1", "9", HandlerStatus::Fail, None).unwrap();
        assert_eq!(
            action,
            TerminalAction::Fail {
                job_id: "9".to_string(),
                body: JobFailure {
                    worker_id: "worker-1".to_string(),
                    variables: vec![],
                    error_code: "failed".to_string(),
                },
            }
        );
    }

    #[test]
    fn test_handler_worker_id_kept() {
        let mut result = HandlerResult::success(vec![]);
        result.worker_id = "custom".to_string();

        match plan_action("configured", "1", HandlerStatus::Success, Some(result)) {
            Some(TerminalAction::Complete { body, .. }) => assert_eq!(body.worker_id, "custom"),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_unknown_status_skipped() {
        assert!(plan_action("w", "1", HandlerStatus::Unknown, None).is_none());
    }

    #[tokio::test]
    async fn test_empty_job_id_makes_no_calls() {
        let transport = MockTransport::shared();
        let client = client(&transport);

        for status in [
            HandlerStatus::Success,
            HandlerStatus::Fail,
            HandlerStatus::BpmnError,
            HandlerStatus::CmmnTerminate,
            HandlerStatus::Unknown,
        ] {
            let disposition = reduce(&client, "w", "", status, Some(HandlerResult::new(status))).await;
            assert_eq!(disposition, Disposition::Skipped);
        }

        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_reduce_posts_fail_with_default_code() {
        let transport = MockTransport::shared();

        let disposition = reduce(
            &client(&transport),
            "worker-1",
            "17",
            HandlerStatus::Fail,
            Some(HandlerResult::new(HandlerStatus::Fail)),
        )
        .await;

        assert_eq!(disposition, Disposition::Posted);
        let posts = transport.posts_to("/acquire/jobs/17/fail");
        assert_eq!(posts.len(), 1);
        assert_eq!(
            posts[0].body,
            Some(json!({"workerId": "worker-1", "variables": [], "errorCode": "failed"}))
        );
    }

    #[tokio::test]
    async fn test_reduce_swallows_post_failure() {
        let transport = MockTransport::shared();
        transport.on_post("/complete", Reply::Respond(500, "boom".to_string()));

        let disposition = reduce(
            &client(&transport),
            "w",
            "1",
            HandlerStatus::Success,
            None,
        )
        .await;

        assert_eq!(disposition, Disposition::PostFailed);
        assert_eq!(transport.posts_to("/complete").len(), 1);
    }
}
