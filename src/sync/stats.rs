//! Counters collected while reconciling

use crate::sync::transfer::CleanupOutcome;

/// What happened to one repository pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoStats {
    pub source: String,
    pub destination: String,
    pub destination_tags: usize,
    pub pages_fetched: usize,
    pub tags_seen: usize,
    /// Tags without an image for the target platform
    pub tags_skipped: usize,
    pub tags_eligible: usize,
    pub in_sync: usize,
    /// Tags whose ECR copy is missing or stale
    pub out_of_sync: usize,
    /// Transfers that completed
    pub synced: usize,
    pub cleanup: CleanupOutcome,
    pub limit_reached: bool,
}

impl RepoStats {
    pub fn new(source: &str, destination: &str) -> Self {
        Self {
            source: source.to_string(),
            destination: destination.to_string(),
            destination_tags: 0,
            pages_fetched: 0,
            tags_seen: 0,
            tags_skipped: 0,
            tags_eligible: 0,
            in_sync: 0,
            out_of_sync: 0,
            synced: 0,
            cleanup: CleanupOutcome::Skipped,
            limit_reached: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub repos: Vec<RepoStats>,
}

impl RunSummary {
    pub fn total_synced(&self) -> usize {
        self.repos.iter().map(|r| r.synced).sum()
    }

    pub fn total_out_of_sync(&self) -> usize {
        self.repos.iter().map(|r| r.out_of_sync).sum()
    }

    pub fn total_in_sync(&self) -> usize {
        self.repos.iter().map(|r| r.in_sync).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.repos.iter().map(|r| r.tags_skipped).sum()
    }

    pub fn cleanup_failures(&self) -> usize {
        self.repos
            .iter()
            .filter(|r| matches!(r.cleanup, CleanupOutcome::Failed(_)))
            .count()
    }

    /// Rows for the end-of-run summary
    pub fn summary_items(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Repositories", self.repos.len().to_string()),
            ("Out of sync", self.total_out_of_sync().to_string()),
            ("Images synced", self.total_synced().to_string()),
            ("Already in sync", self.total_in_sync().to_string()),
            ("Skipped (no matching platform)", self.total_skipped().to_string()),
            (
                "Tag limit reached",
                self.repos.iter().filter(|r| r.limit_reached).count().to_string(),
            ),
            ("Cleanup failures", self.cleanup_failures().to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let mut a = RepoStats::new("library/nginx", "mirror/nginx");
        a.synced = 2;
        a.in_sync = 5;
        a.cleanup = CleanupOutcome::Failed(4);
        let mut b = RepoStats::new("library/redis", "mirror/redis");
        b.synced = 1;
        b.tags_skipped = 3;
        b.limit_reached = true;

        let summary = RunSummary { repos: vec![a, b] };
        assert_eq!(summary.total_synced(), 3);
        assert_eq!(summary.total_in_sync(), 5);
        assert_eq!(summary.total_skipped(), 3);
        assert_eq!(summary.cleanup_failures(), 1);

        let items = summary.summary_items();
        assert_eq!(items[0], ("Repositories", "2".to_string()));
        assert_eq!(items[5], ("Tag limit reached", "1".to_string()));
    }
}
