//! Core domain types
//!
//! These types describe what a job handler reports back to the worker runtime.
//! They double as the wire format for the variables posted to the engine.

pub mod handler;
