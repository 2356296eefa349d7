//! Read-only usage projections over the ledger
//!
//! Pure folds over completed ledger entries. Empty input degrades to empty
//! aggregates, never an error.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use core_kernel::ServiceId;

use crate::ledger::{LedgerEntry, LedgerEntryKind};

/// Credits granted and spent within one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyUsage {
    pub year: i32,
    pub month: u32,
    pub credits_granted: i64,
    pub credits_spent: i64,
}

/// Aggregates completed entries by calendar month of `created_at`
///
/// Returned in chronological order.
pub fn monthly_usage<'a>(entries: impl IntoIterator<Item = &'a LedgerEntry>) -> Vec<MonthlyUsage> {
    let mut months: BTreeMap<(i32, u32), (i64, i64)> = BTreeMap::new();

    for entry in entries.into_iter().filter(|e| e.is_completed()) {
        let key = (entry.created_at.year(), entry.created_at.month());
        let slot = months.entry(key).or_default();
        match entry.kind {
            LedgerEntryKind::Grant | LedgerEntryKind::Adjustment => {
                slot.0 += entry.amount.amount();
            }
            LedgerEntryKind::Debit => {
                slot.1 += entry.amount.abs().amount();
            }
        }
    }

    months
        .into_iter()
        .map(|((year, month), (granted, spent))| MonthlyUsage {
            year,
            month,
            credits_granted: granted,
            credits_spent: spent,
        })
        .collect()
}

/// Credits spent against one catalog service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceUsage {
    pub service_id: ServiceId,
    pub debit_count: u64,
    pub credits_spent: i64,
}

/// Breaks down completed debits per catalog service
///
/// Debits without a service tag are skipped. Sorted by credits spent,
/// heaviest first.
pub fn usage_by_service<'a>(
    entries: impl IntoIterator<Item = &'a LedgerEntry>,
) -> Vec<ServiceUsage> {
    let mut services: BTreeMap<ServiceId, (u64, i64)> = BTreeMap::new();

    for entry in entries
        .into_iter()
        .filter(|e| e.is_completed() && e.kind == LedgerEntryKind::Debit)
    {
        if let Some(service_id) = entry.related_service_id {
            let slot = services.entry(service_id).or_default();
            slot.0 += 1;
            slot.1 += entry.amount.abs().amount();
        }
    }

    let mut breakdown: Vec<ServiceUsage> = services
        .into_iter()
        .map(|(service_id, (count, spent))| ServiceUsage {
            service_id,
            debit_count: count,
            credits_spent: spent,
        })
        .collect();
    breakdown.sort_by(|a, b| b.credits_spent.cmp(&a.credits_spent));
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use core_kernel::{ClientId, Credits};

    fn completed_grant(client: ClientId, amount: i64, y: i32, m: u32) -> LedgerEntry {
        let at = Utc.with_ymd_and_hms(y, m, 10, 0, 0, 0).unwrap();
        let mut e = LedgerEntry::grant(client, Credits::new(amount), "g", at).unwrap();
        e.complete(at).unwrap();
        e
    }

    fn completed_debit(client: ClientId, cost: i64, service: ServiceId) -> LedgerEntry {
        let at = Utc.with_ymd_and_hms(2024, 2, 20, 0, 0, 0).unwrap();
        let mut e = LedgerEntry::debit(client, Credits::new(cost), "d", at)
            .unwrap()
            .with_service(service);
        e.complete(at).unwrap();
        e
    }

    #[test]
    fn test_empty_input_yields_empty_aggregates() {
        assert!(monthly_usage([]).is_empty());
        assert!(usage_by_service([]).is_empty());
    }

    #[test]
    fn test_monthly_usage_groups_by_month() {
        let client = ClientId::new();
        let entries = vec![
            completed_grant(client, 200, 2024, 1),
            completed_grant(client, 200, 2024, 2),
            completed_debit(client, 60, ServiceId::new()),
        ];

        let usage = monthly_usage(&entries);
        assert_eq!(usage.len(), 2);
        assert_eq!(usage[0].year, 2024);
        assert_eq!(usage[0].month, 1);
        assert_eq!(usage[0].credits_granted, 200);
        assert_eq!(usage[1].credits_spent, 60);
    }

    #[test]
    fn test_service_breakdown_sorted_by_spend() {
        let client = ClientId::new();
        let cheap = ServiceId::new();
        let pricey = ServiceId::new();
        let entries = vec![
            completed_debit(client, 10, cheap),
            completed_debit(client, 90, pricey),
            completed_debit(client, 10, cheap),
        ];

        let usage = usage_by_service(&entries);
        assert_eq!(usage.len(), 2);
        assert_eq!(usage[0].service_id, pricey);
        assert_eq!(usage[0].credits_spent, 90);
        assert_eq!(usage[1].debit_count, 2);
        assert_eq!(usage[1].credits_spent, 20);
    }

    #[test]
    fn test_pending_entries_are_excluded() {
        let client = ClientId::new();
        let pending = LedgerEntry::grant(client, Credits::new(500), "p", Utc::now()).unwrap();
        assert!(monthly_usage([&pending]).is_empty());
    }
}
