//! Service-request workflow
//!
//! The heart of the system: a client submits a request against its cost
//! snapshot; staff approve it, which debits the wallet, creates the
//! Campaign+Task work order, and stamps the transition — all inside one
//! client transaction. If any step fails the transaction is dropped and
//! nothing becomes visible: no orphaned debit, no unpaid work order.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use validator::Validate;

use core_kernel::{
    ClientId, Clock, Credits, EmployeeId, NotificationKind, Notifier, ServiceId, ServiceRequestId,
};
use domain_billing::LedgerEntry;
use domain_requests::{RequestStatus, ServiceRequest};
use domain_workorders::{
    Campaign, StandardWorkOrderFactory, Task, WorkOrder, WorkOrderFactory, WorkOrderSpec,
};
use infra_store::CreditStore;

use crate::error::ServiceError;

/// Inbound payload for submitting a request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateServiceRequest {
    pub service_id: ServiceId,
    /// Cost snapshot resolved by the catalog collaborator at submission
    #[validate(range(min = 1, message = "credits cost must be at least 1"))]
    pub credits_cost: i64,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    /// Opaque document URLs; stored, never parsed
    pub attachments: Vec<String>,
}

/// Options accompanying an approval
#[derive(Debug, Clone, Default)]
pub struct ApproveOptions {
    /// Employees assigned to the work order from the start
    pub assignees: Vec<EmployeeId>,
}

/// Everything an approval produced
#[derive(Debug, Clone)]
pub struct ApprovalOutcome {
    pub request: ServiceRequest,
    pub campaign: Campaign,
    pub task: Task,
    pub debit: LedgerEntry,
}

/// Application service for the request workflow
pub struct RequestService {
    store: Arc<CreditStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    factory: Arc<dyn WorkOrderFactory>,
}

impl RequestService {
    pub fn new(store: Arc<CreditStore>, clock: Arc<dyn Clock>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            clock,
            notifier,
            factory: Arc::new(StandardWorkOrderFactory),
        }
    }

    /// Swaps the work-order factory; used to exercise approval fault paths
    pub fn with_factory(mut self, factory: Arc<dyn WorkOrderFactory>) -> Self {
        self.factory = factory;
        self
    }

    /// Submits a new request in `Pending` state
    pub async fn create_service_request(
        &self,
        dto: CreateServiceRequest,
        client_id: ClientId,
    ) -> Result<ServiceRequest, ServiceError> {
        dto.validate()
            .map_err(|err| ServiceError::Validation(err.to_string()))?;

        let now = self.clock.now();
        let mut request = ServiceRequest::submit(
            client_id,
            dto.service_id,
            Credits::new(dto.credits_cost),
            dto.title,
            now,
        )?
        .with_attachments(dto.attachments);
        if let Some(notes) = dto.notes {
            request = request.with_notes(notes);
        }

        let mut txn = self.store.begin(client_id).await?;
        txn.stage_request(request.clone());
        txn.commit().await;

        info!(
            client_id = %client_id,
            request_id = %request.id,
            cost = %request.credits_cost,
            "service request submitted"
        );
        Ok(request)
    }

    /// Approves a pending request: debit + work order + transition, atomically
    ///
    /// Affordability is re-checked here against the cost snapshot taken at
    /// submission — the balance may have drifted since. On insufficiency the
    /// request stays `Pending` and nothing is written.
    pub async fn approve_service_request(
        &self,
        request_id: ServiceRequestId,
        approver_id: EmployeeId,
        opts: ApproveOptions,
    ) -> Result<ApprovalOutcome, ServiceError> {
        let head = self
            .store
            .request(request_id)
            .await
            .ok_or_else(|| ServiceError::not_found("service_request", request_id))?;

        let now = self.clock.now();
        let mut txn = self.store.begin(head.client_id).await?;

        // Re-read under the lock; a concurrent transition may have landed.
        let mut request = txn
            .request(request_id)
            .await
            .ok_or_else(|| ServiceError::not_found("service_request", request_id))?;
        if !request.is_pending() {
            return Err(ServiceError::Conflict(format!(
                "request already processed: {:?}",
                request.status
            )));
        }

        if !txn.wallet().can_afford(request.credits_cost) {
            return Err(ServiceError::InsufficientCredits {
                required: request.credits_cost,
                available: txn.wallet().available_credits,
            });
        }

        // Work order first: a factory failure aborts before any ledger work.
        let WorkOrder { campaign, task } = self.factory.create(
            WorkOrderSpec {
                client_id: request.client_id,
                request_id: request.id,
                service_id: request.service_id,
                title: request.title.clone(),
                assignees: opts.assignees.iter().copied().collect::<BTreeSet<_>>(),
                attachments: request.attachments.clone(),
            },
            now,
        )?;

        let mut debit = LedgerEntry::debit(
            request.client_id,
            request.credits_cost,
            format!("Approved service request '{}'", request.title),
            now,
        )?
        .with_service(request.service_id)
        .with_task(task.id);
        debit.complete(now)?;
        txn.wallet_mut().apply(&debit)?;

        request.approve(approver_id, campaign.id, task.id, now)?;

        txn.stage_ledger_entry(debit.clone());
        txn.stage_campaign(campaign.clone());
        txn.stage_task(task.clone());
        txn.stage_request(request.clone());
        txn.commit().await;

        info!(
            request_id = %request_id,
            approver_id = %approver_id,
            campaign_id = %campaign.id,
            task_id = %task.id,
            debited = %request.credits_cost,
            "service request approved"
        );

        self.dispatch(
            request.client_id,
            NotificationKind::RequestApproved,
            json!({
                "request_id": request.id,
                "task_id": task.id,
                "campaign_id": campaign.id,
                "credits_debited": request.credits_cost,
            }),
        )
        .await;

        Ok(ApprovalOutcome {
            request,
            campaign,
            task,
            debit,
        })
    }

    /// Rejects a pending request; no ledger effect
    pub async fn reject_service_request(
        &self,
        request_id: ServiceRequestId,
        rejecter_id: EmployeeId,
        reason: impl Into<String>,
    ) -> Result<ServiceRequest, ServiceError> {
        let head = self
            .store
            .request(request_id)
            .await
            .ok_or_else(|| ServiceError::not_found("service_request", request_id))?;

        let now = self.clock.now();
        let mut txn = self.store.begin(head.client_id).await?;
        let mut request = txn
            .request(request_id)
            .await
            .ok_or_else(|| ServiceError::not_found("service_request", request_id))?;

        request.reject(rejecter_id, reason, now)?;
        txn.stage_request(request.clone());
        txn.commit().await;

        info!(request_id = %request_id, rejecter_id = %rejecter_id, "service request rejected");

        self.dispatch(
            request.client_id,
            NotificationKind::RequestRejected,
            json!({
                "request_id": request.id,
                "reason": request.rejection_reason,
            }),
        )
        .await;

        Ok(request)
    }

    /// Cancels the client's own pending request
    ///
    /// A request belonging to another client reads as not found rather than
    /// revealing its existence.
    pub async fn cancel_service_request(
        &self,
        request_id: ServiceRequestId,
        client_id: ClientId,
    ) -> Result<ServiceRequest, ServiceError> {
        let head = self
            .store
            .request(request_id)
            .await
            .filter(|r| r.client_id == client_id)
            .ok_or_else(|| ServiceError::not_found("service_request", request_id))?;

        let now = self.clock.now();
        let mut txn = self.store.begin(head.client_id).await?;
        let mut request = txn
            .request(request_id)
            .await
            .ok_or_else(|| ServiceError::not_found("service_request", request_id))?;

        request.cancel(client_id, now)?;
        txn.stage_request(request.clone());
        txn.commit().await;

        info!(request_id = %request_id, client_id = %client_id, "service request cancelled");
        Ok(request)
    }

    /// Admin queue scan
    pub async fn list_requests_by_status(&self, status: RequestStatus) -> Vec<ServiceRequest> {
        self.store.requests_by_status(status).await
    }

    async fn dispatch(&self, recipient: ClientId, kind: NotificationKind, payload: serde_json::Value) {
        if let Err(err) = self.notifier.notify(recipient, kind, payload).await {
            warn!(recipient = %recipient, kind = ?kind, error = %err, "notification dispatch failed");
        }
    }
}
