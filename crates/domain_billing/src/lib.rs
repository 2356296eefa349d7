//! Billing domain
//!
//! The credit side of the platform: a per-client [`Wallet`] materialized from
//! an append-only ledger of [`LedgerEntry`] rows, subscription plans that
//! grant credits each billing cycle, and read-only usage projections.
//!
//! The ledger is the audit source of truth; the wallet is a rebuildable
//! projection of it. All mutation rules live here as pure aggregate logic —
//! locking and atomic commits are the store's job.

pub mod error;
pub mod ledger;
pub mod subscription;
pub mod usage;
pub mod wallet;

pub use error::BillingError;
pub use ledger::{LedgerEntry, LedgerEntryKind, LedgerEntryStatus};
pub use subscription::{Plan, Subscription, SubscriptionStatus};
pub use usage::{monthly_usage, usage_by_service, MonthlyUsage, ServiceUsage};
pub use wallet::Wallet;
