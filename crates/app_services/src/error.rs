//! Unified service error
//!
//! The application layer flattens the domain and store errors into one
//! taxonomy with a stable `kind()` tag, so the (out-of-scope) transport
//! layer can map "insufficient funds" vs "not found" vs "already processed"
//! without string matching.

use core_kernel::Credits;
use thiserror::Error;

use domain_billing::BillingError;
use domain_requests::RequestError;
use domain_workorders::WorkOrderError;
use infra_store::StoreError;

/// Errors surfaced by the application services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A debit would take the balance below zero; nothing was written
    #[error("Insufficient credits: required {required}, available {available}")]
    InsufficientCredits {
        required: Credits,
        available: Credits,
    },

    /// Missing client/service/request/subscription/plan/campaign
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Duplicate active subscription, or a transition on a terminal request
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Wallet lock not acquired within the bounded window; retryable
    #[error("Contention: wallet busy, gave up after {timeout_ms}ms")]
    Contention { timeout_ms: u64 },
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Stable machine-readable tag for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::InsufficientCredits { .. } => "insufficient_credits",
            ServiceError::NotFound { .. } => "not_found",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::Validation(_) => "validation_error",
            ServiceError::Contention { .. } => "contention",
        }
    }

    /// Whether the caller may safely retry the same operation
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::Contention { .. })
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Contention { timeout_ms, .. } => ServiceError::Contention { timeout_ms },
        }
    }
}

impl From<BillingError> for ServiceError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::InsufficientCredits {
                required,
                available,
            } => ServiceError::InsufficientCredits {
                required,
                available,
            },
            BillingError::DuplicateActiveSubscription(client) => ServiceError::Conflict(format!(
                "client {client} already has an active subscription"
            )),
            BillingError::SubscriptionCancelled(id) => {
                ServiceError::Conflict(format!("subscription {id} is cancelled"))
            }
            BillingError::EntryImmutable(id, status) => {
                ServiceError::Conflict(format!("ledger entry {id} is immutable in status {status}"))
            }
            BillingError::InvalidAmount(msg) => ServiceError::Validation(msg),
            BillingError::CycleOverflow => {
                ServiceError::Validation("billing cycle date overflow".to_string())
            }
            BillingError::Credit(e) => ServiceError::Validation(e.to_string()),
        }
    }
}

impl From<RequestError> for ServiceError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::AlreadyProcessed(status) => {
                ServiceError::Conflict(format!("request already processed: {status:?}"))
            }
            RequestError::NotOwner => {
                ServiceError::Conflict("request belongs to a different client".to_string())
            }
            RequestError::Invalid(msg) => ServiceError::Validation(msg),
            RequestError::Credit(e) => ServiceError::Validation(e.to_string()),
        }
    }
}

impl From<WorkOrderError> for ServiceError {
    fn from(err: WorkOrderError) -> Self {
        match err {
            WorkOrderError::InvalidSpec(msg) => ServiceError::Validation(msg),
            WorkOrderError::ForeignTask { .. } => ServiceError::Conflict(err.to_string()),
        }
    }
}
