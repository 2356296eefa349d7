//! Infrastructure store
//!
//! The reference storage adapter for the credit core: an in-memory,
//! concurrency-safe store that defines the transactional contract any other
//! backend must honor.
//!
//! # Concurrency model
//!
//! The single point of contention in the system is the per-client wallet.
//! [`CreditStore::begin`] hands out a [`ClientTxn`] that holds the client's
//! exclusive lock for the whole prepare-validate-commit span, so operations
//! against the same client are strictly serialized while different clients
//! proceed in parallel. Lock acquisition is bounded; a miss surfaces as a
//! retryable [`StoreError::Contention`].
//!
//! # Atomicity
//!
//! A transaction stages rows and applies them under one state guard at
//! [`ClientTxn::commit`]. Readers see all of a commit or none of it, and a
//! transaction dropped without committing leaves no trace.

pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::{ClientTxn, CreditStore, DEFAULT_WALLET_LOCK_TIMEOUT};
