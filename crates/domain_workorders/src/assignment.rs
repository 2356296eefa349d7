//! Transactional assignment synchronization
//!
//! Employee assignment is bidirectional: assigning to a campaign assigns to
//! every task under it, and removal mirrors on both sides. The whole change
//! is computed here as one in-place set operation so the caller can commit
//! campaign and tasks together; there is no multi-step write sequence that
//! could be observed half-applied.

use std::collections::BTreeSet;

use core_kernel::EmployeeId;

use crate::campaign::Campaign;
use crate::error::WorkOrderError;
use crate::task::Task;

/// Replaces the campaign's assignee set and mirrors it onto its tasks
///
/// `tasks` must all belong to `campaign`; a foreign task aborts the change
/// before anything is mutated.
pub fn sync_assignees(
    campaign: &mut Campaign,
    tasks: &mut [Task],
    assignees: &BTreeSet<EmployeeId>,
) -> Result<(), WorkOrderError> {
    if let Some(stray) = tasks.iter().find(|t| t.campaign_id != campaign.id) {
        return Err(WorkOrderError::ForeignTask {
            task_id: stray.id.to_string(),
            campaign_id: campaign.id.to_string(),
        });
    }

    campaign.assignees = assignees.clone();
    for task in tasks.iter_mut() {
        task.assignees = assignees.clone();
    }
    Ok(())
}

/// Whether the campaign's assignees cover the union of its tasks' assignees
pub fn campaign_covers_tasks<'a>(
    campaign: &Campaign,
    tasks: impl IntoIterator<Item = &'a Task>,
) -> bool {
    tasks
        .into_iter()
        .filter(|t| t.campaign_id == campaign.id)
        .all(|t| t.assignees.is_subset(&campaign.assignees))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use core_kernel::{ClientId, ServiceId};

    fn setup() -> (Campaign, Vec<Task>) {
        let campaign = Campaign::new(ClientId::new(), "c", Utc::now());
        let tasks = (0..3)
            .map(|i| {
                Task::new(
                    campaign.id,
                    campaign.client_id,
                    ServiceId::new(),
                    format!("task {i}"),
                    Utc::now(),
                )
            })
            .collect();
        (campaign, tasks)
    }

    #[test]
    fn test_assignment_mirrors_to_all_tasks() {
        let (mut campaign, mut tasks) = setup();
        let team = BTreeSet::from([EmployeeId::new(), EmployeeId::new()]);

        sync_assignees(&mut campaign, &mut tasks, &team).unwrap();

        assert_eq!(campaign.assignees, team);
        for task in &tasks {
            assert_eq!(task.assignees, team);
        }
        assert!(campaign_covers_tasks(&campaign, &tasks));
    }

    #[test]
    fn test_removal_mirrors_to_all_tasks() {
        let (mut campaign, mut tasks) = setup();
        let alice = EmployeeId::new();
        let bob = EmployeeId::new();
        sync_assignees(&mut campaign, &mut tasks, &BTreeSet::from([alice, bob])).unwrap();

        sync_assignees(&mut campaign, &mut tasks, &BTreeSet::from([alice])).unwrap();

        assert!(!campaign.assignees.contains(&bob));
        for task in &tasks {
            assert!(!task.assignees.contains(&bob));
        }
        assert!(campaign_covers_tasks(&campaign, &tasks));
    }

    #[test]
    fn test_foreign_task_aborts_before_mutation() {
        let (mut campaign, _) = setup();
        let (other_campaign, _) = setup();
        let mut foreign = vec![Task::new(
            other_campaign.id,
            other_campaign.client_id,
            ServiceId::new(),
            "foreign",
            Utc::now(),
        )];

        let team = BTreeSet::from([EmployeeId::new()]);
        let err = sync_assignees(&mut campaign, &mut foreign, &team).unwrap_err();
        assert!(matches!(err, WorkOrderError::ForeignTask { .. }));
        assert!(campaign.assignees.is_empty());
        assert!(foreign[0].assignees.is_empty());
    }
}
