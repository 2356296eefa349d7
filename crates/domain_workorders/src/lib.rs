//! Work order domain
//!
//! An approved service request turns into billable work: a [`Campaign`]
//! grouping the engagement and a [`Task`] under it for the delivery team.
//! The [`WorkOrderFactory`] builds the linked pair; assignment changes flow
//! through [`assignment`] so a campaign and its tasks never drift apart.

pub mod assignment;
pub mod campaign;
pub mod error;
pub mod factory;
pub mod task;

pub use assignment::{campaign_covers_tasks, sync_assignees};
pub use campaign::{Campaign, CampaignStatus};
pub use error::WorkOrderError;
pub use factory::{StandardWorkOrderFactory, WorkOrder, WorkOrderFactory, WorkOrderSpec};
pub use task::{Task, TaskStatus};
