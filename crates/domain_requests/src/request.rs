//! Service request aggregate and its state machine
//!
//! States: `Pending` (initial) -> `Approved` | `Rejected` | `Cancelled`,
//! all terminal. Each transition stamps who acted and when; the stamps and
//! every other field are frozen once the request leaves `Pending`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{
    CampaignId, ClientId, Credits, EmployeeId, ServiceId, ServiceRequestId, TaskId,
};

use crate::error::RequestError;

/// Service request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub fn is_terminal(&self) -> bool {
        *self != RequestStatus::Pending
    }
}

/// A client's request to consume a catalog service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: ServiceRequestId,
    pub client_id: ClientId,
    pub service_id: ServiceId,
    /// Cost snapshot taken at creation; approval re-checks affordability
    /// against this value, never a live price lookup
    pub credits_cost: Credits,
    pub title: String,
    pub notes: Option<String>,
    /// Opaque document URLs from the upload collaborator
    pub attachments: Vec<String>,
    pub status: RequestStatus,
    pub approved_by: Option<EmployeeId>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<EmployeeId>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Work-order stamps, set together at approval
    pub task_id: Option<TaskId>,
    pub campaign_id: Option<CampaignId>,
    pub created_at: DateTime<Utc>,
}

impl ServiceRequest {
    /// Submits a new request in `Pending` state
    pub fn submit(
        client_id: ClientId,
        service_id: ServiceId,
        credits_cost: Credits,
        title: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, RequestError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(RequestError::Invalid("title must not be empty".into()));
        }
        let credits_cost = credits_cost
            .require_positive()
            .map_err(|_| RequestError::Invalid("credits cost must be positive".into()))?;

        Ok(Self {
            id: ServiceRequestId::new_v7(),
            client_id,
            service_id,
            credits_cost,
            title,
            notes: None,
            attachments: Vec::new(),
            status: RequestStatus::Pending,
            approved_by: None,
            approved_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
            cancelled_at: None,
            task_id: None,
            campaign_id: None,
            created_at: now,
        })
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<String>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    fn require_pending(&self) -> Result<(), RequestError> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(RequestError::AlreadyProcessed(self.status))
        }
    }

    /// Transitions to `Approved`, stamping the work-order pair
    ///
    /// The debit and work-order creation happen in the caller's atomic unit;
    /// this only validates and records the transition.
    pub fn approve(
        &mut self,
        approver: EmployeeId,
        campaign_id: CampaignId,
        task_id: TaskId,
        now: DateTime<Utc>,
    ) -> Result<(), RequestError> {
        self.require_pending()?;
        self.status = RequestStatus::Approved;
        self.approved_by = Some(approver);
        self.approved_at = Some(now);
        self.campaign_id = Some(campaign_id);
        self.task_id = Some(task_id);
        Ok(())
    }

    /// Transitions to `Rejected` with the reviewer's reason; no ledger effect
    pub fn reject(
        &mut self,
        rejecter: EmployeeId,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), RequestError> {
        self.require_pending()?;
        self.status = RequestStatus::Rejected;
        self.rejected_by = Some(rejecter);
        self.rejected_at = Some(now);
        self.rejection_reason = Some(reason.into());
        Ok(())
    }

    /// Transitions to `Cancelled`; only the owning client may cancel
    pub fn cancel(&mut self, by: ClientId, now: DateTime<Utc>) -> Result<(), RequestError> {
        if by != self.client_id {
            return Err(RequestError::NotOwner);
        }
        self.require_pending()?;
        self.status = RequestStatus::Cancelled;
        self.cancelled_at = Some(now);
        Ok(())
    }
}
