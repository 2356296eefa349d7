//! Subscription plans and billing-cycle state
//!
//! A plan says how many credits a cycle grants; a subscription tracks a
//! client's position in the cycle via `next_billing_date`. Renewal is
//! idempotent per cycle: granting and advancing the date happen in the same
//! atomic commit, so a duplicate renewal inside the window finds the
//! subscription not due and does nothing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{next_cycle_date, ClientId, Credits, PlanId, SubscriptionId};

use crate::error::BillingError;

/// A catalog subscription plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    /// Credits granted at each renewal
    pub credits_per_cycle: Credits,
    /// Monetary price per cycle, if the plan is billed
    pub monetary_price: Option<Decimal>,
}

impl Plan {
    pub fn new(name: impl Into<String>, credits_per_cycle: Credits) -> Result<Self, BillingError> {
        Ok(Self {
            id: PlanId::new(),
            name: name.into(),
            credits_per_cycle: credits_per_cycle.require_positive()?,
            monetary_price: None,
        })
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.monetary_price = Some(price);
        self
    }
}

/// Subscription status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
}

/// A client's subscription to a plan
///
/// At most one active subscription per client; the store enforces the
/// uniqueness, this aggregate owns the cycle math.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub client_id: ClientId,
    pub plan_id: PlanId,
    pub status: SubscriptionStatus,
    /// Start of the next billing cycle; renewal is due once `now` reaches it
    pub next_billing_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Starts a subscription now; the first cycle runs until one month out
    pub fn start(
        client_id: ClientId,
        plan_id: PlanId,
        now: DateTime<Utc>,
    ) -> Result<Self, BillingError> {
        let next_billing_date = next_cycle_date(now).ok_or(BillingError::CycleOverflow)?;
        Ok(Self {
            id: SubscriptionId::new_v7(),
            client_id,
            plan_id,
            status: SubscriptionStatus::Active,
            next_billing_date,
            created_at: now,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }

    /// Whether a renewal is due at `now`
    ///
    /// A second renewal call inside the same window sees `false` here and
    /// becomes a no-op — this is the idempotence guard.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && now >= self.next_billing_date
    }

    /// Advances the cycle after a successful grant
    pub fn advance_cycle(&mut self) -> Result<(), BillingError> {
        if !self.is_active() {
            return Err(BillingError::SubscriptionCancelled(self.id));
        }
        self.next_billing_date =
            next_cycle_date(self.next_billing_date).ok_or(BillingError::CycleOverflow)?;
        Ok(())
    }

    /// Cancels the subscription; already-granted credits stay granted
    pub fn cancel(&mut self) {
        self.status = SubscriptionStatus::Cancelled;
    }
}
