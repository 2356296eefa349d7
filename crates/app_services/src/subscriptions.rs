//! Subscription service
//!
//! Creating a subscription performs the initial grant; the external
//! scheduler then calls [`SubscriptionService::renew_subscription`] each
//! cycle. Renewal is idempotent per billing window: the grant and the
//! advancement of `next_billing_date` commit together, so a duplicate
//! trigger finds the subscription not due and reports `AlreadyCurrent`.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use core_kernel::{ClientId, Clock, NotificationKind, Notifier, PlanId, SubscriptionId};
use domain_billing::{BillingError, LedgerEntry, Subscription};
use infra_store::CreditStore;

use crate::error::ServiceError;

/// Outcome of a renewal trigger
#[derive(Debug, Clone)]
pub enum RenewalOutcome {
    /// Credits granted and the billing date advanced
    Renewed {
        subscription: Subscription,
        entry: LedgerEntry,
    },
    /// Already renewed for this window; nothing happened
    AlreadyCurrent { subscription: Subscription },
}

/// Application service for subscriptions and their credit grants
pub struct SubscriptionService {
    store: Arc<CreditStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl SubscriptionService {
    pub fn new(store: Arc<CreditStore>, clock: Arc<dyn Clock>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            clock,
            notifier,
        }
    }

    /// Creates a subscription and performs the initial grant
    ///
    /// Rejects with a conflict if the client already holds an active
    /// subscription.
    pub async fn create_subscription(
        &self,
        client_id: ClientId,
        plan_id: PlanId,
    ) -> Result<(Subscription, LedgerEntry), ServiceError> {
        let now = self.clock.now();
        let mut txn = self.store.begin(client_id).await?;

        if txn.active_subscription().await.is_some() {
            return Err(BillingError::DuplicateActiveSubscription(client_id).into());
        }
        let plan = txn
            .plan(plan_id)
            .await
            .ok_or_else(|| ServiceError::not_found("plan", plan_id))?;

        let subscription = Subscription::start(client_id, plan_id, now)?;
        let mut entry = LedgerEntry::grant(
            client_id,
            plan.credits_per_cycle,
            format!("Initial grant for plan '{}'", plan.name),
            now,
        )?;
        if let Some(price) = plan.monetary_price {
            entry = entry.with_monetary_amount(price);
        }
        entry.complete(now)?;
        txn.wallet_mut().apply(&entry)?;

        txn.stage_ledger_entry(entry.clone());
        txn.stage_subscription(subscription.clone());
        txn.commit().await;

        info!(
            client_id = %client_id,
            subscription_id = %subscription.id,
            plan = %plan.name,
            "subscription created"
        );
        self.dispatch_grant(client_id, &entry).await;
        Ok((subscription, entry))
    }

    /// Grants the plan's credits if the subscription is due, else a no-op
    pub async fn renew_subscription(
        &self,
        subscription_id: SubscriptionId,
    ) -> Result<RenewalOutcome, ServiceError> {
        let head = self
            .store
            .subscription(subscription_id)
            .await
            .ok_or_else(|| ServiceError::not_found("subscription", subscription_id))?;

        let now = self.clock.now();
        let mut txn = self.store.begin(head.client_id).await?;

        // Re-read under the lock; the pre-lock copy may be stale.
        let mut subscription = txn
            .subscription(subscription_id)
            .await
            .ok_or_else(|| ServiceError::not_found("subscription", subscription_id))?;

        if !subscription.is_active() {
            return Err(BillingError::SubscriptionCancelled(subscription_id).into());
        }
        if !subscription.is_due(now) {
            return Ok(RenewalOutcome::AlreadyCurrent { subscription });
        }

        let plan = txn
            .plan(subscription.plan_id)
            .await
            .ok_or_else(|| ServiceError::not_found("plan", subscription.plan_id))?;

        let mut entry = LedgerEntry::grant(
            subscription.client_id,
            plan.credits_per_cycle,
            format!("Cycle renewal for plan '{}'", plan.name),
            now,
        )?;
        if let Some(price) = plan.monetary_price {
            entry = entry.with_monetary_amount(price);
        }
        entry.complete(now)?;
        txn.wallet_mut().apply(&entry)?;
        subscription.advance_cycle()?;

        txn.stage_ledger_entry(entry.clone());
        txn.stage_subscription(subscription.clone());
        txn.commit().await;

        info!(
            subscription_id = %subscription_id,
            granted = %plan.credits_per_cycle,
            next_billing_date = %subscription.next_billing_date,
            "subscription renewed"
        );
        self.dispatch_grant(subscription.client_id, &entry).await;
        Ok(RenewalOutcome::Renewed {
            subscription,
            entry,
        })
    }

    /// Cancels a subscription; already-granted credits are untouched.
    /// Cancelling twice is a no-op.
    pub async fn cancel_subscription(
        &self,
        subscription_id: SubscriptionId,
    ) -> Result<Subscription, ServiceError> {
        let head = self
            .store
            .subscription(subscription_id)
            .await
            .ok_or_else(|| ServiceError::not_found("subscription", subscription_id))?;

        let mut txn = self.store.begin(head.client_id).await?;
        let mut subscription = txn
            .subscription(subscription_id)
            .await
            .ok_or_else(|| ServiceError::not_found("subscription", subscription_id))?;

        if subscription.is_active() {
            subscription.cancel();
            txn.stage_subscription(subscription.clone());
            txn.commit().await;
            info!(subscription_id = %subscription_id, "subscription cancelled");
        }
        Ok(subscription)
    }

    async fn dispatch_grant(&self, client_id: ClientId, entry: &LedgerEntry) {
        let payload = json!({
            "entry_id": entry.id,
            "amount": entry.amount,
            "description": entry.description,
        });
        if let Err(err) = self
            .notifier
            .notify(client_id, NotificationKind::CreditsGranted, payload)
            .await
        {
            warn!(client_id = %client_id, error = %err, "grant notification failed");
        }
    }
}
