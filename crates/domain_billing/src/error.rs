//! Billing domain errors

use core_kernel::{ClientId, CreditError, Credits, LedgerEntryId, SubscriptionId};
use thiserror::Error;

/// Errors that can occur in the billing domain
#[derive(Debug, Error)]
pub enum BillingError {
    /// A debit would take the wallet below zero
    #[error("Insufficient credits: required {required}, available {available}")]
    InsufficientCredits {
        required: Credits,
        available: Credits,
    },

    /// Amount has the wrong sign or is zero for the entry kind
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Completed ledger entries never change
    #[error("Ledger entry {0} is immutable in status {1}")]
    EntryImmutable(LedgerEntryId, String),

    /// A client can hold at most one active subscription
    #[error("Client {0} already has an active subscription")]
    DuplicateActiveSubscription(ClientId),

    /// Renewal attempted on a cancelled subscription
    #[error("Subscription {0} is cancelled")]
    SubscriptionCancelled(SubscriptionId),

    /// Billing-cycle date arithmetic left chrono's range
    #[error("Billing cycle date overflow")]
    CycleOverflow,

    /// Credit arithmetic failure
    #[error("Credit error: {0}")]
    Credit(#[from] CreditError),
}
