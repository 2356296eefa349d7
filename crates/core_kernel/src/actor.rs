//! Actor context handed in by the authenticated edge
//!
//! Authentication happens outside this core. Handlers receive an
//! [`ActorContext`] that has already been verified upstream; the core trusts
//! it and never re-validates credentials.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of an authenticated actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Client,
    Staff,
    Admin,
}

impl Role {
    /// Staff and admins act on the approval queue
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Staff | Role::Admin)
    }
}

/// Identity and role of the actor behind the current operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    pub actor_id: Uuid,
    pub role: Role,
}

impl ActorContext {
    pub fn new(actor_id: Uuid, role: Role) -> Self {
        Self { actor_id, role }
    }
}
