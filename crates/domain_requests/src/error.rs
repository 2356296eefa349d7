//! Service request domain errors

use core_kernel::CreditError;
use thiserror::Error;

use crate::request::RequestStatus;

/// Errors that can occur in the request domain
#[derive(Debug, Error)]
pub enum RequestError {
    /// A terminal request admits no further transitions
    #[error("Request already processed: status is {0:?}")]
    AlreadyProcessed(RequestStatus),

    /// Only the owning client may cancel a request
    #[error("Request belongs to a different client")]
    NotOwner,

    /// Malformed request input
    #[error("Invalid request: {0}")]
    Invalid(String),

    /// Credit arithmetic failure
    #[error("Credit error: {0}")]
    Credit(#[from] CreditError),
}
