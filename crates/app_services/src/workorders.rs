//! Work-order assignment service
//!
//! Assignment is bidirectional: the campaign's assignee set and every task
//! under it change together, in one client transaction, so no reader ever
//! sees a half-synchronized team.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::info;

use core_kernel::{CampaignId, EmployeeId};
use domain_workorders::{sync_assignees, Campaign, Task};
use infra_store::CreditStore;

use crate::error::ServiceError;

/// Application service for campaign/task assignment
pub struct WorkOrderService {
    store: Arc<CreditStore>,
}

impl WorkOrderService {
    pub fn new(store: Arc<CreditStore>) -> Self {
        Self { store }
    }

    /// Replaces the campaign's assignee set, mirrored onto all of its tasks
    pub async fn set_campaign_assignees(
        &self,
        campaign_id: CampaignId,
        assignees: Vec<EmployeeId>,
    ) -> Result<(Campaign, Vec<Task>), ServiceError> {
        let head = self
            .store
            .campaign(campaign_id)
            .await
            .ok_or_else(|| ServiceError::not_found("campaign", campaign_id))?;

        let mut txn = self.store.begin(head.client_id).await?;
        let mut campaign = txn
            .campaign(campaign_id)
            .await
            .ok_or_else(|| ServiceError::not_found("campaign", campaign_id))?;
        let mut tasks = txn.tasks_for_campaign(campaign_id).await;

        let desired: BTreeSet<EmployeeId> = assignees.into_iter().collect();
        sync_assignees(&mut campaign, &mut tasks, &desired)?;

        txn.stage_campaign(campaign.clone());
        for task in &tasks {
            txn.stage_task(task.clone());
        }
        txn.commit().await;

        info!(
            campaign_id = %campaign_id,
            assignees = campaign.assignees.len(),
            tasks = tasks.len(),
            "campaign assignees synchronized"
        );
        Ok((campaign, tasks))
    }
}
