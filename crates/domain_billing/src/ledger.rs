//! Append-only credit ledger entries
//!
//! Every balance-affecting event becomes a [`LedgerEntry`]: positive amounts
//! for grants and adjustments, negative amounts for debits. Entries start
//! `Pending` and are completed inside the same atomic commit that updates
//! the wallet. A completed entry is immutable.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ClientId, Credits, LedgerEntryId, ServiceId, TaskId};

use crate::error::BillingError;

/// The kind of balance-affecting event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntryKind {
    /// Credits added by a subscription renewal or package purchase
    Grant,
    /// Credits consumed by an approved service request
    Debit,
    /// Manual correction by staff
    Adjustment,
}

/// Processing status of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntryStatus {
    Pending,
    Completed,
    Failed,
}

/// One immutable record of a balance-affecting event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier (time-ordered)
    pub id: LedgerEntryId,
    /// Owning client
    pub client_id: ClientId,
    /// Event kind
    pub kind: LedgerEntryKind,
    /// Signed credit amount: positive grants, negative debits
    pub amount: Credits,
    /// Monetary value of the event, when one exists (package price etc.)
    pub monetary_amount: Option<Decimal>,
    /// Human-readable description for statements
    pub description: String,
    /// Catalog service this entry pays for, if any
    pub related_service_id: Option<ServiceId>,
    /// Work-order task this entry funded, if any
    pub related_task_id: Option<TaskId>,
    /// Processing status
    pub status: LedgerEntryStatus,
    /// When the entry was recorded
    pub created_at: DateTime<Utc>,
    /// When the entry reached a terminal status
    pub processed_at: Option<DateTime<Utc>>,
}

impl LedgerEntry {
    /// Creates a pending entry, validating the amount sign against the kind
    ///
    /// Grants and adjustments must be positive; debits must be negative.
    pub fn new(
        client_id: ClientId,
        kind: LedgerEntryKind,
        amount: Credits,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, BillingError> {
        match kind {
            LedgerEntryKind::Grant | LedgerEntryKind::Adjustment => {
                if !amount.is_positive() {
                    return Err(BillingError::InvalidAmount(format!(
                        "{kind:?} entries must carry a positive amount, got {amount}"
                    )));
                }
            }
            LedgerEntryKind::Debit => {
                if !amount.is_negative() {
                    return Err(BillingError::InvalidAmount(format!(
                        "Debit entries must carry a negative amount, got {amount}"
                    )));
                }
            }
        }

        Ok(Self {
            id: LedgerEntryId::new_v7(),
            client_id,
            kind,
            amount,
            monetary_amount: None,
            description: description.into(),
            related_service_id: None,
            related_task_id: None,
            status: LedgerEntryStatus::Pending,
            created_at: now,
            processed_at: None,
        })
    }

    /// Creates a pending grant of `amount` credits
    pub fn grant(
        client_id: ClientId,
        amount: Credits,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, BillingError> {
        Self::new(client_id, LedgerEntryKind::Grant, amount, description, now)
    }

    /// Creates a pending debit consuming `cost` credits (`cost` is positive)
    pub fn debit(
        client_id: ClientId,
        cost: Credits,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, BillingError> {
        let cost = cost.require_positive()?;
        Self::new(client_id, LedgerEntryKind::Debit, -cost, description, now)
    }

    /// Tags the entry with the catalog service it pays for
    pub fn with_service(mut self, service_id: ServiceId) -> Self {
        self.related_service_id = Some(service_id);
        self
    }

    /// Tags the entry with the work-order task it funded
    pub fn with_task(mut self, task_id: TaskId) -> Self {
        self.related_task_id = Some(task_id);
        self
    }

    /// Attaches the monetary value of the event
    pub fn with_monetary_amount(mut self, amount: Decimal) -> Self {
        self.monetary_amount = Some(amount);
        self
    }

    /// Marks the entry completed; legal only from `Pending`
    pub fn complete(&mut self, now: DateTime<Utc>) -> Result<(), BillingError> {
        if self.status != LedgerEntryStatus::Pending {
            return Err(BillingError::EntryImmutable(
                self.id,
                format!("{:?}", self.status),
            ));
        }
        self.status = LedgerEntryStatus::Completed;
        self.processed_at = Some(now);
        Ok(())
    }

    /// Marks the entry failed; legal only from `Pending`
    pub fn fail(&mut self, now: DateTime<Utc>) -> Result<(), BillingError> {
        if self.status != LedgerEntryStatus::Pending {
            return Err(BillingError::EntryImmutable(
                self.id,
                format!("{:?}", self.status),
            ));
        }
        self.status = LedgerEntryStatus::Failed;
        self.processed_at = Some(now);
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        self.status == LedgerEntryStatus::Completed
    }
}
