//! Core Kernel - Foundational types and utilities for the credit platform
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Credit amounts with checked integer arithmetic
//! - A clock abstraction so billing-cycle math is deterministic under test
//! - Common identifiers and value objects
//! - The notification port consumed by the application layer

pub mod credits;
pub mod clock;
pub mod identifiers;
pub mod actor;
pub mod ports;

pub use credits::{Credits, CreditError};
pub use clock::{Clock, SystemClock, ManualClock, next_cycle_date};
pub use identifiers::{
    ClientId, EmployeeId, LedgerEntryId, ServiceId, ServiceRequestId,
    CampaignId, TaskId, SubscriptionId, PlanId,
};
pub use actor::{ActorContext, Role};
pub use ports::{NoopNotifier, Notifier, NotifyError, NotificationKind};
