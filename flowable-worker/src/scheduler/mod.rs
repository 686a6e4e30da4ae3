//! Scheduler layer for the worker
//!
//! This layer drives acquisition on a fixed cadence and hands each acquired
//! batch to the dispatcher. One subscription runs per topic.

pub mod subscription;

pub use subscription::{CycleOutcome, Subscription, SubscriptionRequest};
