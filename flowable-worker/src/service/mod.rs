//! Service layer
//!
//! Services contain the per-job logic of a subscription: handing each job
//! to the handler and turning the handler's verdict into exactly one terminal
//! action on the engine.

pub mod dispatcher;
pub mod reducer;

pub use dispatcher::{JobDispatcher, extract_job_id};
pub use reducer::{Disposition, TerminalAction, apply_action, plan_action, reduce};
