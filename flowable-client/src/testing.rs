//! In-memory transport for tests
//!
//! [`MockTransport`] answers requests from scripted replies matched by method
//! and URL suffix, and records every request it receives.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::{ClientError, Result};
use crate::transport::{RawResponse, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Scripted answer to a request
#[derive(Debug, Clone)]
pub enum Reply {
    Respond(u16, String),
    Fail(String),
}

impl Reply {
    pub fn json(status: u16, body: Value) -> Self {
        Reply::Respond(status, body.to_string())
    }
}

/// A request captured by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    /// Decoded POST payload, `None` for GET or non-JSON payloads
    pub body: Option<Value>,
}

struct Route {
    method: Method,
    suffix: String,
    replies: VecDeque<Reply>,
}

/// Scriptable [`Transport`]
///
/// Replies queued on a route are consumed in order; the last one repeats.
/// Unmatched requests get `200` with an empty body.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Queues a reply for POST requests whose URL ends with `suffix`
    pub fn on_post(&self, suffix: &str, reply: Reply) -> &Self {
        self.push_route(Method::Post, suffix, reply)
    }

    /// Queues a reply for GET requests whose URL ends with `suffix`
    pub fn on_get(&self, suffix: &str, reply: Reply) -> &Self {
        self.push_route(Method::Get, suffix, reply)
    }

    fn push_route(&self, method: Method, suffix: &str, reply: Reply) -> &Self {
        let mut routes = self.routes.lock().unwrap();
        match routes
            .iter_mut()
            .find(|r| r.method == method && r.suffix == suffix)
        {
            Some(route) => route.replies.push_back(reply),
            None => routes.push(Route {
                method,
                suffix: suffix.to_string(),
                replies: VecDeque::from([reply]),
            }),
        }
        self
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// POST requests whose URL ends with `suffix`
    pub fn posts_to(&self, suffix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == Method::Post && r.url.ends_with(suffix))
            .collect()
    }

    fn answer(&self, method: Method, url: &str, body: Option<Value>) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            url: url.to_string(),
            body,
        });

        let reply = {
            let mut routes = self.routes.lock().unwrap();
            routes
                .iter_mut()
                .find(|r| r.method == method && url.ends_with(&r.suffix))
                .and_then(|route| {
                    if route.replies.len() > 1 {
                        route.replies.pop_front()
                    } else {
                        route.replies.front().cloned()
                    }
                })
        };

        match reply {
            Some(Reply::Respond(status, body)) => Ok(RawResponse::new(status, body)),
            Some(Reply::Fail(message)) => Err(ClientError::Transport(message)),
            None => Ok(RawResponse::new(200, "")),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<RawResponse> {
        self.answer(Method::Get, url, None)
    }

    async fn post(&self, url: &str, body: Vec<u8>) -> Result<RawResponse> {
        let body = serde_json::from_slice(&body).ok();
        self.answer(Method::Post, url, body)
    }
}
