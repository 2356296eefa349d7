//! Pre-built test fixtures and store seeding helpers

use chrono::{DateTime, TimeZone, Utc};

use core_kernel::{ClientId, Credits};
use domain_billing::LedgerEntry;
use infra_store::CreditStore;

/// Fixture for temporal test data
pub struct TimeFixtures;

impl TimeFixtures {
    /// Standard test epoch (Jan 15, 2024, mid-month to keep cycle math dull)
    pub fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    /// A month-end date for cycle clamping scenarios
    pub fn month_end() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 31, 23, 0, 0).unwrap()
    }
}

/// Seeds a client's wallet with granted credits, committing the grant and
/// the ledger row the way production writes do
pub async fn seed_credits(
    store: &CreditStore,
    client_id: ClientId,
    amount: i64,
    at: DateTime<Utc>,
) {
    let mut entry = LedgerEntry::grant(client_id, Credits::new(amount), "test seed", at)
        .expect("seed amount must be positive");
    entry.complete(at).expect("fresh entry completes");

    let mut txn = store.begin(client_id).await.expect("seed wallet lock");
    txn.wallet_mut().apply(&entry).expect("seed grant applies");
    txn.stage_ledger_entry(entry);
    txn.commit().await;
}
