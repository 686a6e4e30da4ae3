//! Flowable External Worker
//!
//! Runtime that bridges the engine's external job API and business handlers.
//!
//! Architecture:
//! - Configuration: engine connection and subscription settings from the environment
//! - Handlers: the [`JobHandler`] capability that turns a job into a verdict
//! - Services: per-job dispatch and reduction of verdicts to terminal actions
//! - Scheduler: one polling loop per subscribed topic
//!
//! Each subscription acquires a batch of jobs, hands every job to the handler
//! in turn, posts exactly one terminal action per identifiable job, then sleeps
//! for its fixed poll interval.

pub mod config;
pub mod handler;
pub mod scheduler;
pub mod service;

pub use config::Config;
pub use handler::{EchoHandler, FnHandler, JobHandler, Verdict};
pub use scheduler::{CycleOutcome, Subscription, SubscriptionRequest};
