//! Reconciliation engine
//!
//! Decides per Docker Hub tag whether the ECR copy is current and performs the transfers
//! that are not.

pub mod decision;
pub mod platform;
pub mod reconciler;
pub mod stats;
pub mod transfer;

pub use decision::{SyncDecision, TransferPlan, decide};
pub use platform::select_image;
pub use reconciler::Reconciler;
pub use stats::{RepoStats, RunSummary};
pub use transfer::{CleanupOutcome, ContainerCli, DockerCli, TransferExecutor, TransferRecord};
