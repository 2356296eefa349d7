//! Task aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use core_kernel::{CampaignId, ClientId, EmployeeId, ServiceId, TaskId};

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

/// A unit of billable work under a campaign
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub campaign_id: CampaignId,
    pub client_id: ClientId,
    /// The catalog service being delivered
    pub service_id: ServiceId,
    pub title: String,
    pub status: TaskStatus,
    pub assignees: BTreeSet<EmployeeId>,
    /// Opaque document URLs from the upload collaborator; stored, never parsed
    pub attachments: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        campaign_id: CampaignId,
        client_id: ClientId,
        service_id: ServiceId,
        title: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TaskId::new_v7(),
            campaign_id,
            client_id,
            service_id,
            title: title.into(),
            status: TaskStatus::Pending,
            assignees: BTreeSet::new(),
            attachments: Vec::new(),
            created_at: now,
        }
    }

    pub fn with_attachments(mut self, attachments: Vec<String>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn is_open(&self) -> bool {
        matches!(self.status, TaskStatus::Pending | TaskStatus::InProgress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_starts_pending() {
        let task = Task::new(
            CampaignId::new(),
            ClientId::new(),
            ServiceId::new(),
            "Landing page",
            Utc::now(),
        );
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.is_open());
        assert!(task.assignees.is_empty());
    }

    #[test]
    fn test_attachments_are_stored_verbatim() {
        let urls = vec!["s3://bucket/brief.pdf".to_string()];
        let task = Task::new(
            CampaignId::new(),
            ClientId::new(),
            ServiceId::new(),
            "t",
            Utc::now(),
        )
        .with_attachments(urls.clone());
        assert_eq!(task.attachments, urls);
    }
}
