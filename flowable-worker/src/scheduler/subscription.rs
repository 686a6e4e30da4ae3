//! Subscription loop
//!
//! Acquires jobs for one topic, dispatches the batch sequentially, then sleeps
//! for the poll interval. The interval is fixed: a failing engine is re-polled
//! at the same rate as a healthy one.

use flowable_client::ExternalWorkerClient;
use flowable_core::dto::job::AcquireRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, info, warn};

use crate::handler::JobHandler;
use crate::service::dispatcher::JobDispatcher;

/// Parameters of one subscription, immutable once the loop starts
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionRequest {
    /// Acquire parameters sent on every poll
    pub acquire: AcquireRequest,
    /// Delay between poll cycles
    pub poll_interval: Duration,
}

/// Result of a single poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Acquisition failed; the handler was told via a synthetic failure
    AcquireFailed,
    /// Acquisition returned no jobs
    Idle,
    /// Number of jobs handed to the handler
    Dispatched(usize),
}

/// Polling loop for one topic
pub struct Subscription {
    request: SubscriptionRequest,
    client: ExternalWorkerClient,
    dispatcher: JobDispatcher,
}

impl Subscription {
    /// Creates a subscription
    ///
    /// The client, including its transport configuration, is fully built
    /// before the subscription exists and is only read from then on.
    pub fn new(
        request: SubscriptionRequest,
        client: ExternalWorkerClient,
        handler: Arc<dyn JobHandler>,
    ) -> Self {
        let dispatcher =
            JobDispatcher::new(client.clone(), handler, request.acquire.worker_id.clone());
        Self {
            request,
            client,
            dispatcher,
        }
    }

    pub fn topic(&self) -> &str {
        &self.request.acquire.topic
    }

    /// Runs the polling loop until shutdown is signalled
    ///
    /// The flag is checked at the top of each cycle and interrupts the sleep
    /// between cycles once it turns `true`; other updates leave the sleep
    /// running. Dropping the sender also stops the loop. A cycle that
    /// is already dispatching finishes its batch first.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            topic = self.topic(),
            "Starting subscription (interval: {:?})", self.request.poll_interval
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.poll_once().await {
                CycleOutcome::Dispatched(count) => {
                    info!(topic = self.topic(), "Dispatched {} job(s) this cycle", count);
                }
                CycleOutcome::Idle => debug!(topic = self.topic(), "No jobs available"),
                CycleOutcome::AcquireFailed => warn!(
                    topic = self.topic(),
                    "Acquire failed, retrying in {:?}", self.request.poll_interval
                ),
            }

            tokio::select! {
                _ = time::sleep(self.request.poll_interval) => {}
                // Resolves only on `true` or a dropped sender
                _ = shutdown.wait_for(|stop| *stop) => break,
            }
        }

        info!(topic = self.topic(), "Subscription stopped");
    }

    /// Performs a single poll cycle
    pub async fn poll_once(&self) -> CycleOutcome {
        let acquired = match self.client.acquire_jobs(&self.request.acquire).await {
            Ok(acquired) => acquired,
            Err(e) => {
                warn!(topic = self.topic(), "Failed to acquire jobs: {:#}", e);
                self.dispatcher.report_failure().await;
                return CycleOutcome::AcquireFailed;
            }
        };

        if acquired.jobs.is_empty() {
            return CycleOutcome::Idle;
        }

        debug!(
            topic = self.topic(),
            "Found {} job(s) to dispatch",
            acquired.jobs.len()
        );

        let dispositions = self
            .dispatcher
            .dispatch_batch(acquired.status, &acquired.jobs)
            .await;

        CycleOutcome::Dispatched(dispositions.len())
    }
}
