//! Per-client materialized credit balance
//!
//! The wallet is a projection of the ledger, not the source of truth.
//!
//! # Invariants
//!
//! - `available_credits == total_earned - total_spent`
//! - `available_credits >= 0`
//!
//! Both hold after every successful [`Wallet::apply`]; a violating entry is
//! rejected without touching the wallet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClientId, Credits};

use crate::error::BillingError;
use crate::ledger::{LedgerEntry, LedgerEntryKind};

/// A client's materialized credit balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Owning client (unique)
    pub client_id: ClientId,
    /// Spendable balance, never negative
    pub available_credits: Credits,
    /// Lifetime credits granted
    pub total_earned: Credits,
    /// Lifetime credits consumed (stored positive)
    pub total_spent: Credits,
    /// Last balance-affecting event
    pub last_transaction_at: Option<DateTime<Utc>>,
}

impl Wallet {
    /// Creates an empty wallet for a client
    ///
    /// Wallet access is get-or-create: a missing wallet is synthesized as a
    /// zero-balance record, idempotently.
    pub fn new(client_id: ClientId) -> Self {
        Self {
            client_id,
            available_credits: Credits::ZERO,
            total_earned: Credits::ZERO,
            total_spent: Credits::ZERO,
            last_transaction_at: None,
        }
    }

    /// Whether a debit of `cost` (positive) fits the current balance
    pub fn can_afford(&self, cost: Credits) -> bool {
        cost <= self.available_credits
    }

    /// Applies one ledger entry to the balance
    ///
    /// Grants and adjustments always succeed. A debit is admitted only when
    /// the resulting balance stays non-negative; otherwise the wallet is
    /// left untouched and `InsufficientCredits` is returned.
    pub fn apply(&mut self, entry: &LedgerEntry) -> Result<(), BillingError> {
        debug_assert_eq!(entry.client_id, self.client_id);

        match entry.kind {
            LedgerEntryKind::Grant | LedgerEntryKind::Adjustment => {
                let amount = entry.amount.require_positive()?;
                self.available_credits = self.available_credits.checked_add(amount)?;
                self.total_earned = self.total_earned.checked_add(amount)?;
            }
            LedgerEntryKind::Debit => {
                if !entry.amount.is_negative() {
                    return Err(BillingError::InvalidAmount(format!(
                        "debit entry with non-negative amount {}",
                        entry.amount
                    )));
                }
                let candidate = self.available_credits.checked_add(entry.amount)?;
                if candidate.is_negative() {
                    return Err(BillingError::InsufficientCredits {
                        required: entry.amount.abs(),
                        available: self.available_credits,
                    });
                }
                self.available_credits = candidate;
                self.total_spent = self.total_spent.checked_add(entry.amount.abs())?;
            }
        }

        self.last_transaction_at = Some(entry.created_at);
        Ok(())
    }

    /// Rebuilds a wallet by replaying completed ledger entries
    ///
    /// The ledger is authoritative; this is the reconciliation path that
    /// re-materializes the projection from scratch.
    pub fn rebuild<'a>(
        client_id: ClientId,
        entries: impl IntoIterator<Item = &'a LedgerEntry>,
    ) -> Result<Self, BillingError> {
        let mut wallet = Wallet::new(client_id);
        for entry in entries {
            if entry.is_completed() {
                wallet.apply(entry)?;
            }
        }
        Ok(wallet)
    }

    /// Checks the wallet invariants; used by tests and reconciliation
    pub fn invariant_holds(&self) -> bool {
        !self.available_credits.is_negative()
            && self
                .total_earned
                .checked_sub(self.total_spent)
                .map(|diff| diff == self.available_credits)
                .unwrap_or(false)
    }
}
