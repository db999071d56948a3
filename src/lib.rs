//! Hub to ECR mirror library
//!
//! Keeps AWS ECR repositories up to date with the single-platform images of their Docker
//! Hub counterparts.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod process;
pub mod registry;
pub mod sync;

pub use config::{MirrorConfig, Platform, RepoPair, SyncOptions};
pub use error::{MirrorError, Result};
pub use logging::Logger;
pub use sync::{Reconciler, RunSummary};
