//! Outbound ports consumed by the application layer
//!
//! The core emits fire-and-forget notification calls through the
//! [`Notifier`] port. Delivery transport (email, chat, websocket) lives in
//! external collaborators; adapters implement this trait. A failed delivery
//! is logged by the caller and never rolls back the operation that
//! triggered it.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::identifiers::ClientId;

/// Error type for notification dispatch
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The transport refused or dropped the message
    #[error("Delivery failed: {message}")]
    Delivery {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The recipient is unknown to the transport
    #[error("Unknown recipient: {0}")]
    UnknownRecipient(ClientId),
}

/// What a notification is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    RequestApproved,
    RequestRejected,
    CreditsGranted,
}

/// Fire-and-forget notification dispatch
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        recipient: ClientId,
        kind: NotificationKind,
        payload: Value,
    ) -> Result<(), NotifyError>;
}

/// A notifier that drops everything on the floor
///
/// Default wiring for deployments that route notifications elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(
        &self,
        _recipient: ClientId,
        _kind: NotificationKind,
        _payload: Value,
    ) -> Result<(), NotifyError> {
        Ok(())
    }
}
