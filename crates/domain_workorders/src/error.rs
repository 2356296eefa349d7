//! Work order domain errors

use thiserror::Error;

/// Errors that can occur when building or mutating work orders
#[derive(Debug, Error)]
pub enum WorkOrderError {
    /// The work-order spec is unusable
    #[error("Invalid work order: {0}")]
    InvalidSpec(String),

    /// Task does not belong to the campaign being synchronized
    #[error("Task {task_id} does not belong to campaign {campaign_id}")]
    ForeignTask {
        task_id: String,
        campaign_id: String,
    },
}
