//! Test data builders
//!
//! Builder patterns for constructing test data with sensible defaults, so
//! tests specify only the fields they care about.

use core_kernel::Credits;
use domain_billing::Plan;

/// Builder for subscription plans
pub struct PlanBuilder {
    name: String,
    credits_per_cycle: Credits,
}

impl Default for PlanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self {
            name: "Standard".to_string(),
            credits_per_cycle: Credits::new(200),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_credits_per_cycle(mut self, credits: i64) -> Self {
        self.credits_per_cycle = Credits::new(credits);
        self
    }

    pub fn build(self) -> Plan {
        Plan::new(self.name, self.credits_per_cycle).expect("test plan is valid")
    }
}
