//! Work order factory
//!
//! Builds the linked Campaign+Task pair for an approved service request.
//! The factory is a trait so the approval path can be exercised against a
//! failing implementation: the application layer must abort the entire
//! approval unit when work-order creation fails.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

use core_kernel::{ClientId, EmployeeId, ServiceId, ServiceRequestId};

use crate::campaign::Campaign;
use crate::error::WorkOrderError;
use crate::task::Task;

/// Everything needed to build a work order
#[derive(Debug, Clone)]
pub struct WorkOrderSpec {
    pub client_id: ClientId,
    pub request_id: ServiceRequestId,
    pub service_id: ServiceId,
    pub title: String,
    pub assignees: BTreeSet<EmployeeId>,
    pub attachments: Vec<String>,
}

/// The linked Campaign+Task pair representing billable work
#[derive(Debug, Clone)]
pub struct WorkOrder {
    pub campaign: Campaign,
    pub task: Task,
}

/// Builds work orders from approved requests
pub trait WorkOrderFactory: Send + Sync {
    fn create(&self, spec: WorkOrderSpec, now: DateTime<Utc>) -> Result<WorkOrder, WorkOrderError>;
}

/// The production factory
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardWorkOrderFactory;

impl WorkOrderFactory for StandardWorkOrderFactory {
    fn create(&self, spec: WorkOrderSpec, now: DateTime<Utc>) -> Result<WorkOrder, WorkOrderError> {
        if spec.title.trim().is_empty() {
            return Err(WorkOrderError::InvalidSpec(
                "work order title must not be empty".to_string(),
            ));
        }

        let mut campaign = Campaign::new(spec.client_id, spec.title.clone(), now)
            .for_request(spec.request_id);

        let mut task = Task::new(campaign.id, spec.client_id, spec.service_id, spec.title, now)
            .with_attachments(spec.attachments);

        // Initial assignees land on both halves so the superset invariant
        // holds from the first instant.
        campaign.assignees = spec.assignees.clone();
        task.assignees = spec.assignees;

        Ok(WorkOrder { campaign, task })
    }
}
