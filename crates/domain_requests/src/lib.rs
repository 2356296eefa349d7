//! Service request domain
//!
//! A client asks to consume a catalog service; staff approve, reject, or the
//! client cancels. [`ServiceRequest`] owns the state machine: `Pending` is
//! the only non-terminal state, each terminal transition stamps immutable
//! audit fields, and nothing else ever mutates after that.

pub mod error;
pub mod request;

pub use error::RequestError;
pub use request::{RequestStatus, ServiceRequest};
