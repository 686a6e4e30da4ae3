//! Job handlers
//!
//! A handler receives the HTTP status of the acquire call together with one
//! serialized job document and returns how the job should be disposed of.

use async_trait::async_trait;
use flowable_core::{HandlerResult, HandlerStatus, HandlerVariable, decode_variables, get_var};
use tracing::debug;

/// What a handler returns for a single job
pub type Verdict = (HandlerStatus, Option<HandlerResult>);

/// Business logic plugged into a subscription
///
/// `status` is the HTTP status of the acquire response, or `500` with an empty
/// `body` when acquisition itself failed.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn translate(&self, status: u16, body: &str) -> Verdict;
}

/// Adapts a plain function or closure into a [`JobHandler`]
pub struct FnHandler<F>(pub F);

#[async_trait]
impl<F> JobHandler for FnHandler<F>
where
    F: Fn(u16, &str) -> Verdict + Send + Sync,
{
    async fn translate(&self, status: u16, body: &str) -> Verdict {
        (self.0)(status, body)
    }
}

/// Sample handler that echoes the job's variables back on completion
///
/// - An error status fails the job with the status code as error code
/// - A body that cannot be decoded fails the job with the decode error text
/// - Otherwise the job completes with its own variables plus `handledBy`
pub struct EchoHandler {
    name: String,
}

impl EchoHandler {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for EchoHandler {
    fn default() -> Self {
        Self::new("echo")
    }
}

#[async_trait]
impl JobHandler for EchoHandler {
    async fn translate(&self, status: u16, body: &str) -> Verdict {
        let mut result = HandlerResult::success(Vec::new());

        if status >= 400 {
            result = HandlerResult::failed(status.to_string());
        }

        if !body.is_empty() {
            match decode_variables(body) {
                Ok(vars) => {
                    debug!(input = %get_var(&vars, "inputVar"), "Decoded job variables");
                    result = HandlerResult::success(vars).with_variable(HandlerVariable::new(
                        "handledBy",
                        "string",
                        self.name.as_str(),
                    ));
                }
                Err(e) => {
                    result.error_code = e.to_string();
                    result.status = HandlerStatus::Fail;
                }
            }
        }

        (result.status, Some(result))
    }
}
