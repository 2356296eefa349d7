//! Tests for the service-request state machine

use chrono::Utc;
use core_kernel::{CampaignId, ClientId, Credits, EmployeeId, ServiceId, TaskId};
use domain_requests::{RequestError, RequestStatus, ServiceRequest};

fn submit(cost: i64) -> ServiceRequest {
    ServiceRequest::submit(
        ClientId::new(),
        ServiceId::new(),
        Credits::new(cost),
        "PPC campaign setup",
        Utc::now(),
    )
    .unwrap()
}

#[test]
fn test_cost_snapshot_is_locked_at_creation() {
    let req = submit(60);
    // Nothing on the aggregate can change the snapshot after submission;
    // approval reads this value, never the live catalog.
    assert_eq!(req.credits_cost, Credits::new(60));
    let serialized = serde_json::to_value(&req).unwrap();
    assert_eq!(serialized["credits_cost"], 60);
}

#[test]
fn test_every_terminal_state_blocks_every_transition() {
    let terminal_states = [
        {
            let mut r = submit(10);
            r.approve(EmployeeId::new(), CampaignId::new(), TaskId::new(), Utc::now())
                .unwrap();
            r
        },
        {
            let mut r = submit(10);
            r.reject(EmployeeId::new(), "budget", Utc::now()).unwrap();
            r
        },
        {
            let mut r = submit(10);
            r.cancel(r.client_id, Utc::now()).unwrap();
            r
        },
    ];

    for mut req in terminal_states {
        let status = req.status;
        assert!(status.is_terminal());
        assert!(matches!(
            req.approve(EmployeeId::new(), CampaignId::new(), TaskId::new(), Utc::now()),
            Err(RequestError::AlreadyProcessed(s)) if s == status
        ));
        assert!(matches!(
            req.reject(EmployeeId::new(), "again", Utc::now()),
            Err(RequestError::AlreadyProcessed(_))
        ));
        assert!(matches!(
            req.cancel(req.client_id, Utc::now()),
            Err(RequestError::AlreadyProcessed(_))
        ));
        assert_eq!(req.status, status);
    }
}

#[test]
fn test_rejection_never_touches_work_order_stamps() {
    let mut req = submit(40);
    req.reject(EmployeeId::new(), "duplicate request", Utc::now())
        .unwrap();

    assert_eq!(req.status, RequestStatus::Rejected);
    assert!(req.task_id.is_none());
    assert!(req.campaign_id.is_none());
    assert!(req.approved_by.is_none());
}

#[test]
fn test_attachments_and_notes_survive_submission() {
    let req = ServiceRequest::submit(
        ClientId::new(),
        ServiceId::new(),
        Credits::new(30),
        "Design refresh",
        Utc::now(),
    )
    .unwrap()
    .with_notes("brand guidelines attached")
    .with_attachments(vec!["https://files.example/brief".to_string()]);

    assert_eq!(req.notes.as_deref(), Some("brand guidelines attached"));
    assert_eq!(req.attachments.len(), 1);
}
