//! Shared test utilities for the credit platform
//!
//! Deterministic fixtures, data builders, notifier doubles, and store
//! seeding helpers used across the workspace test suites.

pub mod builders;
pub mod factories;
pub mod fixtures;
pub mod logging;
pub mod notifier;

pub use builders::PlanBuilder;
pub use factories::FailingWorkOrderFactory;
pub use fixtures::{seed_credits, TimeFixtures};
pub use logging::init_test_logging;
pub use notifier::{FailingNotifier, RecordingNotifier, SentNotification};
