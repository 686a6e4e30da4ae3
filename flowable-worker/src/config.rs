//! Worker configuration
//!
//! Defines the engine connection, credentials and the acquire parameters
//! shared by every subscribed topic. The configuration is built once at
//! startup and handed to each subscription; nothing mutates it afterwards.

use flowable_client::{Auth, TransportConfig};
use flowable_core::dto::job::{AcquireRequest, ScopeType};
use std::time::Duration;

use crate::scheduler::SubscriptionRequest;

/// Worker configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Identifier reported to the engine when acquiring and finishing jobs
    pub worker_id: String,

    /// Engine base URL (e.g., "http://localhost:8090")
    pub engine_url: String,

    /// Topics to subscribe to, one polling loop each
    pub topics: Vec<String>,

    /// ISO-8601 duration acquired jobs stay locked to this worker
    pub lock_duration: String,

    /// Maximum number of jobs acquired per poll
    pub number_of_tasks: u32,

    /// Retries the engine grants a job failed by this worker
    pub number_of_retries: u32,

    /// Whether jobs come from process or case instances
    pub scope_type: ScopeType,

    /// Fixed delay between poll cycles
    pub poll_interval: Duration,

    /// Engine credentials
    pub auth: Option<Auth>,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(worker_id: String, engine_url: String) -> Self {
        Self {
            worker_id,
            engine_url,
            topics: Vec::new(),
            lock_duration: "PT10M".to_string(),
            number_of_tasks: 1,
            number_of_retries: 5,
            scope_type: ScopeType::Bpmn,
            poll_interval: Duration::from_secs(10),
            auth: None,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - FLOWABLE_URL (required)
    /// - FLOWABLE_TOPICS (required, comma-separated)
    /// - FLOWABLE_WORKER_ID (optional, default: random UUID)
    /// - FLOWABLE_LOCK_DURATION (optional, default: PT10M)
    /// - FLOWABLE_NUMBER_OF_TASKS (optional, default: 1)
    /// - FLOWABLE_NUMBER_OF_RETRIES (optional, default: 5)
    /// - FLOWABLE_SCOPE_TYPE (optional, bpmn or cmmn, default: bpmn)
    /// - FLOWABLE_POLL_INTERVAL (optional, seconds, default: 10)
    /// - FLOWABLE_USER / FLOWABLE_PASSWORD (optional, basic auth)
    /// - FLOWABLE_TOKEN (optional, bearer auth, takes precedence over basic auth)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let engine_url = lookup("FLOWABLE_URL")
            .ok_or_else(|| anyhow::anyhow!("FLOWABLE_URL environment variable not set"))?;

        let topics: Vec<String> = lookup("FLOWABLE_TOPICS")
            .ok_or_else(|| anyhow::anyhow!("FLOWABLE_TOPICS environment variable not set"))?
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        let worker_id =
            lookup("FLOWABLE_WORKER_ID").unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let mut config = Self::new(worker_id, engine_url);
        config.topics = topics;

        if let Some(lock_duration) = lookup("FLOWABLE_LOCK_DURATION") {
            config.lock_duration = lock_duration;
        }

        config.number_of_tasks = lookup("FLOWABLE_NUMBER_OF_TASKS")
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(config.number_of_tasks);

        config.number_of_retries = lookup("FLOWABLE_NUMBER_OF_RETRIES")
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(config.number_of_retries);

        if let Some(scope) = lookup("FLOWABLE_SCOPE_TYPE") {
            config.scope_type = scope.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        }

        config.poll_interval = lookup("FLOWABLE_POLL_INTERVAL")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(config.poll_interval);

        config.auth = match (
            lookup("FLOWABLE_TOKEN"),
            lookup("FLOWABLE_USER"),
            lookup("FLOWABLE_PASSWORD"),
        ) {
            (Some(token), _, _) => Some(Auth::Bearer(token)),
            (None, Some(user), password) => Some(Auth::Basic {
                user,
                password: password.unwrap_or_default(),
            }),
            (None, None, _) => None,
        };

        Ok(config)
    }

    /// Adds a topic to subscribe to
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topics.push(topic.into());
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.worker_id.is_empty() {
            anyhow::bail!("worker_id cannot be empty");
        }

        if self.engine_url.is_empty() {
            anyhow::bail!("engine_url cannot be empty");
        }

        if !self.engine_url.starts_with("http://") && !self.engine_url.starts_with("https://") {
            anyhow::bail!("engine_url must start with http:// or https://");
        }

        if self.topics.is_empty() {
            anyhow::bail!("at least one topic is required");
        }

        if self.number_of_tasks == 0 {
            anyhow::bail!("number_of_tasks must be greater than 0");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        Ok(())
    }

    /// Transport settings carrying the configured credentials
    pub fn transport_config(&self) -> TransportConfig {
        let mut transport = TransportConfig::new();
        transport.auth = self.auth.clone();
        transport
    }

    /// One subscription request per topic
    pub fn subscriptions(&self) -> Vec<SubscriptionRequest> {
        self.topics
            .iter()
            .map(|topic| SubscriptionRequest {
                acquire: AcquireRequest {
                    topic: topic.clone(),
                    lock_duration: self.lock_duration.clone(),
                    number_of_tasks: self.number_of_tasks,
                    number_of_retries: self.number_of_retries,
                    worker_id: self.worker_id.clone(),
                    scope_type: self.scope_type,
                },
                poll_interval: self.poll_interval,
            })
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            uuid::Uuid::new_v4().to_string(),
            "http://localhost:8090".to_string(),
        )
    }
}
