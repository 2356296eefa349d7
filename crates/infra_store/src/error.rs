//! Store errors

use core_kernel::ClientId;
use thiserror::Error;

/// Errors surfaced by the store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The client's wallet lock could not be acquired in the bounded window.
    /// Retryable: the holder commits or aborts in finite time.
    #[error("Wallet for client {client_id} is contended; gave up after {timeout_ms}ms")]
    Contention {
        client_id: ClientId,
        timeout_ms: u64,
    },
}
