//! Data Transfer Objects for the external job REST API
//!
//! Request bodies posted to the engine. Responses from the acquire endpoint
//! are left as opaque JSON documents.

pub mod job;
