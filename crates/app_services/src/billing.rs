//! Billing service
//!
//! Wallet access, ledger writes, read-only projections, and the
//! ledger-replay reconciliation path. Every balance-affecting write goes
//! through a [`ClientTxn`](infra_store::ClientTxn): the wallet update and
//! the completed ledger row become visible together or not at all.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use core_kernel::{ClientId, Clock, Credits, ServiceId, TaskId};
use domain_billing::{
    monthly_usage, usage_by_service, LedgerEntry, LedgerEntryKind, MonthlyUsage, ServiceUsage,
    Wallet,
};
use infra_store::CreditStore;

use crate::error::ServiceError;

/// Optional references attached to a ledger entry
#[derive(Debug, Clone, Default)]
pub struct LedgerRefs {
    pub service_id: Option<ServiceId>,
    pub task_id: Option<TaskId>,
    pub monetary_amount: Option<Decimal>,
}

/// Read-only wallet projection handed to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletView {
    pub client_id: ClientId,
    pub available_credits: Credits,
    pub total_earned: Credits,
    pub total_spent: Credits,
    pub last_transaction_at: Option<DateTime<Utc>>,
}

impl From<Wallet> for WalletView {
    fn from(wallet: Wallet) -> Self {
        Self {
            client_id: wallet.client_id,
            available_credits: wallet.available_credits,
            total_earned: wallet.total_earned,
            total_spent: wallet.total_spent,
            last_transaction_at: wallet.last_transaction_at,
        }
    }
}

/// Result of replaying the ledger against the stored wallet projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletRebuild {
    pub stored: WalletView,
    pub rebuilt: WalletView,
    /// True when the stored projection drifted from the authoritative ledger
    pub diverged: bool,
}

/// Application service for the wallet and ledger
pub struct BillingService {
    store: Arc<CreditStore>,
    clock: Arc<dyn Clock>,
}

impl BillingService {
    pub fn new(store: Arc<CreditStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Reads a client's wallet, synthesizing a zero balance if none exists
    pub async fn get_or_create_wallet(&self, client_id: ClientId) -> WalletView {
        self.store.wallet(client_id).await.into()
    }

    /// Applies one balance-affecting event
    ///
    /// Grants and adjustments always succeed; debits require sufficient
    /// funds. The wallet update and the completed ledger row commit as one
    /// unit.
    pub async fn apply_ledger_entry(
        &self,
        client_id: ClientId,
        kind: LedgerEntryKind,
        amount: Credits,
        description: impl Into<String>,
        refs: LedgerRefs,
    ) -> Result<LedgerEntry, ServiceError> {
        let now = self.clock.now();
        let mut entry = LedgerEntry::new(client_id, kind, amount, description, now)?;
        if let Some(service_id) = refs.service_id {
            entry = entry.with_service(service_id);
        }
        if let Some(task_id) = refs.task_id {
            entry = entry.with_task(task_id);
        }
        if let Some(monetary) = refs.monetary_amount {
            entry = entry.with_monetary_amount(monetary);
        }

        let mut txn = self.store.begin(client_id).await?;
        entry.complete(now)?;
        txn.wallet_mut().apply(&entry)?;
        txn.stage_ledger_entry(entry.clone());
        txn.commit().await;

        info!(
            client_id = %client_id,
            entry_id = %entry.id,
            kind = ?kind,
            amount = %amount,
            "ledger entry applied"
        );
        Ok(entry)
    }

    /// Transaction history, most recent first
    pub async fn transaction_history(&self, client_id: ClientId) -> Vec<LedgerEntry> {
        let mut entries = self.store.ledger_for(client_id).await;
        entries.reverse();
        entries
    }

    /// Credits granted and spent per calendar month
    pub async fn monthly_usage(&self, client_id: ClientId) -> Vec<MonthlyUsage> {
        let entries = self.store.ledger_for(client_id).await;
        monthly_usage(&entries)
    }

    /// Spend breakdown per catalog service
    pub async fn usage_by_service(&self, client_id: ClientId) -> Vec<ServiceUsage> {
        let entries = self.store.ledger_for(client_id).await;
        usage_by_service(&entries)
    }

    /// Replays the ledger and compares against the stored projection
    ///
    /// The ledger is authoritative; the wallet is a materialized view of it.
    /// Runs under the client's lock so no commit can land mid-replay.
    pub async fn rebuild_wallet(&self, client_id: ClientId) -> Result<WalletRebuild, ServiceError> {
        let txn = self.store.begin(client_id).await?;
        let stored = txn.wallet().clone();
        let entries = self.store.ledger_for(client_id).await;
        let rebuilt = Wallet::rebuild(client_id, &entries)?;

        let diverged = stored.available_credits != rebuilt.available_credits
            || stored.total_earned != rebuilt.total_earned
            || stored.total_spent != rebuilt.total_spent;

        Ok(WalletRebuild {
            stored: stored.into(),
            rebuilt: rebuilt.into(),
            diverged,
        })
    }
}
