//! Per-tag sync decision

use crate::registry::DestinationIndex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncDecision {
    InSync,
    NeedsSync(TransferPlan),
}

/// Fully qualified references for one tag that has to be copied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    /// `namespace/repo:tag` on Docker Hub
    pub source_ref: String,
    /// `registry/repo:tag` in ECR
    pub destination_ref: String,
    /// `None` when Docker Hub reported no digest for the image
    pub digest: Option<String>,
}

impl TransferPlan {
    pub fn new(
        source_repo: &str,
        ecr_registry: &str,
        destination_repo: &str,
        tag: &str,
        digest: Option<&str>,
    ) -> Self {
        Self {
            source_ref: format!("{}:{}", source_repo, tag),
            destination_ref: format!("{}/{}:{}", ecr_registry, destination_repo, tag),
            digest: digest.map(str::to_string),
        }
    }
}

/// Compare the selected source digest with what ECR holds for the same tag. Digests must
/// match byte for byte; a missing source digest never matches.
pub fn decide(
    index: &DestinationIndex,
    tag: &str,
    source_digest: Option<&str>,
    plan: impl FnOnce() -> TransferPlan,
) -> SyncDecision {
    match index.get(tag) {
        Some(existing) if Some(existing.digest.as_str()) == source_digest => {
            SyncDecision::InSync
        }
        _ => SyncDecision::NeedsSync(plan()),
    }
}
