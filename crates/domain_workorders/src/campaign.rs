//! Campaign aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use core_kernel::{CampaignId, ClientId, EmployeeId, ServiceRequestId};

/// Campaign status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Active,
    Completed,
    Archived,
}

/// A client engagement grouping one or more tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub client_id: ClientId,
    /// The approved request this campaign was created from, if any
    pub service_request_id: Option<ServiceRequestId>,
    pub name: String,
    pub status: CampaignStatus,
    /// Employees assigned to the engagement; always a superset of the
    /// assignees of the campaign's tasks (see [`crate::assignment`])
    pub assignees: BTreeSet<EmployeeId>,
    pub created_at: DateTime<Utc>,
}

impl Campaign {
    pub fn new(client_id: ClientId, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: CampaignId::new_v7(),
            client_id,
            service_request_id: None,
            name: name.into(),
            status: CampaignStatus::Active,
            assignees: BTreeSet::new(),
            created_at: now,
        }
    }

    /// Links the campaign back to the request it was approved from
    pub fn for_request(mut self, request_id: ServiceRequestId) -> Self {
        self.service_request_id = Some(request_id);
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == CampaignStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_campaign_is_active_and_unassigned() {
        let campaign = Campaign::new(ClientId::new(), "SEO sprint", Utc::now());
        assert!(campaign.is_active());
        assert!(campaign.assignees.is_empty());
        assert!(campaign.service_request_id.is_none());
    }

    #[test]
    fn test_for_request_links_origin() {
        let request_id = ServiceRequestId::new();
        let campaign = Campaign::new(ClientId::new(), "c", Utc::now()).for_request(request_id);
        assert_eq!(campaign.service_request_id, Some(request_id));
    }
}
