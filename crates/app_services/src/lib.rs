//! Application services
//!
//! The use-case layer of the credit core. Each service composes the domain
//! aggregates over the [`infra_store::CreditStore`] and owns the atomic-unit
//! boundaries of the workflow:
//!
//! - [`BillingService`] — wallet access, ledger writes, usage projections,
//!   and ledger-replay reconciliation
//! - [`SubscriptionService`] — plan subscriptions with per-cycle idempotent
//!   renewal grants
//! - [`RequestService`] — the service-request approval workflow: debit +
//!   work order + transition as one unit
//! - [`WorkOrderService`] — campaign/task assignment synchronization
//!
//! Notification dispatch goes through the [`core_kernel::Notifier`] port
//! after commit; failures are logged and swallowed.

pub mod billing;
pub mod config;
pub mod error;
pub mod requests;
pub mod subscriptions;
pub mod workorders;

pub use billing::{BillingService, LedgerRefs, WalletRebuild, WalletView};
pub use config::CoreConfig;
pub use error::ServiceError;
pub use requests::{ApprovalOutcome, ApproveOptions, CreateServiceRequest, RequestService};
pub use subscriptions::{RenewalOutcome, SubscriptionService};
pub use workorders::WorkOrderService;
