//! Work-order factory test doubles

use chrono::{DateTime, Utc};

use domain_workorders::{WorkOrder, WorkOrderError, WorkOrderFactory, WorkOrderSpec};

/// A factory that always fails, simulating a fault mid-approval
///
/// Used to prove the approval unit is atomic: when work-order creation
/// fails, the wallet, ledger, and request must all be untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingWorkOrderFactory;

impl WorkOrderFactory for FailingWorkOrderFactory {
    fn create(
        &self,
        _spec: WorkOrderSpec,
        _now: DateTime<Utc>,
    ) -> Result<WorkOrder, WorkOrderError> {
        Err(WorkOrderError::InvalidSpec(
            "simulated work-order fault".to_string(),
        ))
    }
}
