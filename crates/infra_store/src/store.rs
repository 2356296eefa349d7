//! The concurrent in-memory credit store

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tokio::time::timeout;
use tracing::debug;

use core_kernel::{CampaignId, ClientId, PlanId, ServiceRequestId, SubscriptionId, TaskId};
use domain_billing::{LedgerEntry, Plan, Subscription, SubscriptionStatus, Wallet};
use domain_requests::{RequestStatus, ServiceRequest};
use domain_workorders::{Campaign, Task};

use crate::error::StoreError;

/// Default bound on waiting for a contended wallet
pub const DEFAULT_WALLET_LOCK_TIMEOUT: Duration = Duration::from_millis(2_000);

#[derive(Default)]
struct StoreState {
    wallets: HashMap<ClientId, Wallet>,
    /// Append-only, per client, in commit order (== created_at order since
    /// same-client commits are serialized)
    ledger: HashMap<ClientId, Vec<LedgerEntry>>,
    plans: HashMap<PlanId, Plan>,
    subscriptions: HashMap<SubscriptionId, Subscription>,
    requests: HashMap<ServiceRequestId, ServiceRequest>,
    /// Admin queue index
    requests_by_status: HashMap<RequestStatus, Vec<ServiceRequestId>>,
    campaigns: HashMap<CampaignId, Campaign>,
    tasks: HashMap<TaskId, Task>,
}

impl StoreState {
    fn upsert_request(&mut self, request: ServiceRequest) {
        if let Some(previous) = self.requests.get(&request.id) {
            if previous.status != request.status {
                if let Some(ids) = self.requests_by_status.get_mut(&previous.status) {
                    ids.retain(|id| *id != request.id);
                }
            } else {
                self.requests.insert(request.id, request);
                return;
            }
        }
        self.requests_by_status
            .entry(request.status)
            .or_default()
            .push(request.id);
        self.requests.insert(request.id, request);
    }
}

/// Rows staged by a transaction, applied all-or-nothing at commit
#[derive(Default)]
struct Commit {
    ledger_entries: Vec<LedgerEntry>,
    requests: Vec<ServiceRequest>,
    campaigns: Vec<Campaign>,
    tasks: Vec<Task>,
    subscriptions: Vec<Subscription>,
}

impl Commit {
    fn row_count(&self) -> usize {
        self.ledger_entries.len()
            + self.requests.len()
            + self.campaigns.len()
            + self.tasks.len()
            + self.subscriptions.len()
    }
}

/// Concurrency-safe store for wallets, ledger, requests, and work orders
pub struct CreditStore {
    state: RwLock<StoreState>,
    wallet_locks: std::sync::Mutex<HashMap<ClientId, Arc<Mutex<()>>>>,
    lock_timeout: Duration,
}

impl CreditStore {
    pub fn new(wallet_lock_timeout: Duration) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            wallet_locks: std::sync::Mutex::new(HashMap::new()),
            lock_timeout: wallet_lock_timeout,
        }
    }

    fn wallet_lock(&self, client_id: ClientId) -> Arc<Mutex<()>> {
        let mut locks = self
            .wallet_locks
            .lock()
            .expect("wallet lock registry poisoned");
        Arc::clone(locks.entry(client_id).or_default())
    }

    /// Opens a serialized transaction for one client
    ///
    /// Acquires the client's exclusive lock (bounded wait) and snapshots the
    /// wallet, synthesizing a zero-balance record if none exists yet.
    pub async fn begin(&self, client_id: ClientId) -> Result<ClientTxn<'_>, StoreError> {
        let lock = self.wallet_lock(client_id);
        let guard = timeout(self.lock_timeout, lock.lock_owned())
            .await
            .map_err(|_| StoreError::Contention {
                client_id,
                timeout_ms: self.lock_timeout.as_millis() as u64,
            })?;
        debug!(%client_id, "wallet lock acquired");

        let wallet = {
            let state = self.state.read().await;
            state
                .wallets
                .get(&client_id)
                .cloned()
                .unwrap_or_else(|| Wallet::new(client_id))
        };

        Ok(ClientTxn {
            store: self,
            client_id,
            _guard: guard,
            wallet,
            commit: Commit::default(),
        })
    }

    // ------------------------------------------------------------------
    // Read-only access (no lock beyond a brief state guard)
    // ------------------------------------------------------------------

    /// Get-or-create wallet read; never errors, never writes
    pub async fn wallet(&self, client_id: ClientId) -> Wallet {
        self.state
            .read()
            .await
            .wallets
            .get(&client_id)
            .cloned()
            .unwrap_or_else(|| Wallet::new(client_id))
    }

    /// The client's ledger in chronological order
    pub async fn ledger_for(&self, client_id: ClientId) -> Vec<LedgerEntry> {
        self.state
            .read()
            .await
            .ledger
            .get(&client_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn request(&self, id: ServiceRequestId) -> Option<ServiceRequest> {
        self.state.read().await.requests.get(&id).cloned()
    }

    /// Admin queue scan, via the status index
    pub async fn requests_by_status(&self, status: RequestStatus) -> Vec<ServiceRequest> {
        let state = self.state.read().await;
        state
            .requests_by_status
            .get(&status)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.requests.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub async fn subscription(&self, id: SubscriptionId) -> Option<Subscription> {
        self.state.read().await.subscriptions.get(&id).cloned()
    }

    pub async fn active_subscription_for(&self, client_id: ClientId) -> Option<Subscription> {
        self.state
            .read()
            .await
            .subscriptions
            .values()
            .find(|s| s.client_id == client_id && s.status == SubscriptionStatus::Active)
            .cloned()
    }

    pub async fn plan(&self, id: PlanId) -> Option<Plan> {
        self.state.read().await.plans.get(&id).cloned()
    }

    /// Catalog write; plans are not per-client and bypass wallet locking
    pub async fn insert_plan(&self, plan: Plan) {
        self.state.write().await.plans.insert(plan.id, plan);
    }

    pub async fn campaign(&self, id: CampaignId) -> Option<Campaign> {
        self.state.read().await.campaigns.get(&id).cloned()
    }

    pub async fn task(&self, id: TaskId) -> Option<Task> {
        self.state.read().await.tasks.get(&id).cloned()
    }

    pub async fn tasks_for_campaign(&self, campaign_id: CampaignId) -> Vec<Task> {
        self.state
            .read()
            .await
            .tasks
            .values()
            .filter(|t| t.campaign_id == campaign_id)
            .cloned()
            .collect()
    }
}

impl Default for CreditStore {
    fn default() -> Self {
        Self::new(DEFAULT_WALLET_LOCK_TIMEOUT)
    }
}

/// A serialized unit of work for one client
///
/// Holds the client's wallet lock until committed or dropped. The wallet
/// field is a working copy; staged rows and the wallet are applied together
/// under one state guard at commit. Dropping the transaction aborts it —
/// nothing staged becomes visible.
pub struct ClientTxn<'a> {
    store: &'a CreditStore,
    client_id: ClientId,
    _guard: OwnedMutexGuard<()>,
    wallet: Wallet,
    commit: Commit,
}

impl std::fmt::Debug for ClientTxn<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientTxn")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl ClientTxn<'_> {
    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// The working copy of the wallet
    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// Mutable access for applying ledger entries to the working copy
    pub fn wallet_mut(&mut self) -> &mut Wallet {
        &mut self.wallet
    }

    // ------------------------------------------------------------------
    // Reads of committed state
    //
    // Safe to act on: every mutation of this client's rows goes through a
    // ClientTxn, and we hold the client's lock.
    // ------------------------------------------------------------------

    pub async fn request(&self, id: ServiceRequestId) -> Option<ServiceRequest> {
        self.store.request(id).await
    }

    pub async fn subscription(&self, id: SubscriptionId) -> Option<Subscription> {
        self.store.subscription(id).await
    }

    pub async fn active_subscription(&self) -> Option<Subscription> {
        self.store.active_subscription_for(self.client_id).await
    }

    pub async fn plan(&self, id: PlanId) -> Option<Plan> {
        self.store.plan(id).await
    }

    pub async fn campaign(&self, id: CampaignId) -> Option<Campaign> {
        self.store.campaign(id).await
    }

    pub async fn tasks_for_campaign(&self, campaign_id: CampaignId) -> Vec<Task> {
        self.store.tasks_for_campaign(campaign_id).await
    }

    // ------------------------------------------------------------------
    // Staging
    // ------------------------------------------------------------------

    pub fn stage_ledger_entry(&mut self, entry: LedgerEntry) {
        self.commit.ledger_entries.push(entry);
    }

    pub fn stage_request(&mut self, request: ServiceRequest) {
        self.commit.requests.push(request);
    }

    pub fn stage_campaign(&mut self, campaign: Campaign) {
        self.commit.campaigns.push(campaign);
    }

    pub fn stage_task(&mut self, task: Task) {
        self.commit.tasks.push(task);
    }

    pub fn stage_subscription(&mut self, subscription: Subscription) {
        self.commit.subscriptions.push(subscription);
    }

    /// Applies the wallet and all staged rows as one unit
    pub async fn commit(self) {
        let row_count = self.commit.row_count();
        let mut state = self.store.state.write().await;

        state.wallets.insert(self.client_id, self.wallet);
        state
            .ledger
            .entry(self.client_id)
            .or_default()
            .extend(self.commit.ledger_entries);
        for request in self.commit.requests {
            state.upsert_request(request);
        }
        for campaign in self.commit.campaigns {
            state.campaigns.insert(campaign.id, campaign);
        }
        for task in self.commit.tasks {
            state.tasks.insert(task.id, task);
        }
        for subscription in self.commit.subscriptions {
            state.subscriptions.insert(subscription.id, subscription);
        }

        debug!(client_id = %self.client_id, rows = row_count, "transaction committed");
    }
}
