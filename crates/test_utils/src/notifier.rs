//! Notifier test doubles

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

use core_kernel::{ClientId, NotificationKind, Notifier, NotifyError};

/// One captured notification
#[derive(Debug, Clone)]
pub struct SentNotification {
    pub recipient: ClientId,
    pub kind: NotificationKind,
    pub payload: Value,
}

/// Records every dispatched notification for assertions
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentNotification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().expect("notifier log poisoned").clone()
    }

    pub fn count_of(&self, kind: NotificationKind) -> usize {
        self.sent().iter().filter(|n| n.kind == kind).count()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(
        &self,
        recipient: ClientId,
        kind: NotificationKind,
        payload: Value,
    ) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .expect("notifier log poisoned")
            .push(SentNotification {
                recipient,
                kind,
                payload,
            });
        Ok(())
    }
}

/// Always fails; proves notification failures never surface to callers
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(
        &self,
        _recipient: ClientId,
        _kind: NotificationKind,
        _payload: Value,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery {
            message: "transport down".to_string(),
            source: None,
        })
    }
}
