//! Flowable Core
//!
//! Core types and abstractions shared by the external worker client and runtime.
//!
//! This crate contains:
//! - Domain types: handler verdicts and variables exchanged with job handlers
//! - DTOs: request bodies sent to the external job REST API
//! - Codec: translation between the engine's variable encodings and a flat list

pub mod codec;
pub mod domain;
pub mod dto;

pub use codec::{CodecError, decode_variables, get_var};
pub use domain::handler::{HandlerResult, HandlerStatus, HandlerVariable};
