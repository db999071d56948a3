//! Reconciliation of configured repository pairs
//!
//! For each pair, in configuration order:
//! 1. index the tags ECR already holds,
//! 2. walk Docker Hub tag pages, most recently updated first,
//! 3. keep the image for the target platform and compare digests,
//! 4. pull/tag/push whatever is missing or stale,
//! 5. remove the local copies once the pair is done.
//!
//! Any failure other than cleanup ends the whole run.

use crate::config::{DEFAULT_HUB_URL, RepoPair, SyncOptions};
use crate::error::Result;
use crate::logging::Logger;
use crate::registry::{
    DestinationIndex, DestinationRegistry, HubTag, SourceRegistry, TagPaginator,
    build_destination_index,
};
use crate::sync::decision::{SyncDecision, TransferPlan, decide};
use crate::sync::platform::select_image;
use crate::sync::stats::{RepoStats, RunSummary};
use crate::sync::transfer::{ContainerCli, TransferExecutor, TransferRecord};

pub struct Reconciler<'a> {
    destination: &'a dyn DestinationRegistry,
    source: &'a dyn SourceRegistry,
    executor: TransferExecutor<'a>,
    options: SyncOptions,
    hub_url: String,
    logger: Logger,
}

/// Why a page walk stopped early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageFlow {
    Continue,
    LimitReached,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        destination: &'a dyn DestinationRegistry,
        source: &'a dyn SourceRegistry,
        cli: &'a dyn ContainerCli,
        options: SyncOptions,
        logger: Logger,
    ) -> Self {
        Self {
            destination,
            source,
            executor: TransferExecutor::new(cli, logger.clone()),
            options,
            hub_url: DEFAULT_HUB_URL.to_string(),
            logger,
        }
    }

    pub fn with_hub_url(mut self, hub_url: impl Into<String>) -> Self {
        self.hub_url = hub_url.into();
        self
    }

    /// Reconcile every pair in order, stopping at the first fatal error.
    pub async fn run(&self, pairs: &[RepoPair]) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        for (i, pair) in pairs.iter().enumerate() {
            self.logger.section(&format!(
                "[{}/{}] Syncing {} to {}",
                i + 1,
                pairs.len(),
                pair.source,
                pair.destination
            ));
            let stats = self.reconcile_pair(pair).await?;
            self.logger.success(&format!(
                "{}: {} synced, {} in sync, {} skipped",
                pair.destination, stats.synced, stats.in_sync, stats.tags_skipped
            ));
            summary.repos.push(stats);
        }
        Ok(summary)
    }

    pub async fn reconcile_pair(&self, pair: &RepoPair) -> Result<RepoStats> {
        let mut stats = RepoStats::new(&pair.source, &pair.destination);

        let index = build_destination_index(self.destination, &pair.destination).await?;
        stats.destination_tags = index.len();
        self.logger.detail(&format!(
            "{} tagged images already in {}",
            index.len(),
            pair.destination
        ));

        let mut record = TransferRecord::new();

        if self.options.tag_limit == Some(0) {
            stats.limit_reached = true;
            self.logger.info("Tag limit is 0, not looking at any source tags");
        } else {
            let mut paginator = TagPaginator::new(self.source, &self.hub_url, &pair.source)?;
            while let Some(tags) = paginator.next_page().await? {
                let flow = self
                    .process_page(pair, &index, tags, &mut record, &mut stats)
                    .await?;
                if flow == PageFlow::LimitReached {
                    stats.limit_reached = true;
                    self.logger.info(&format!(
                        "Reached tag limit of {} for {}",
                        stats.tags_eligible, pair.source
                    ));
                    break;
                }
            }
            stats.pages_fetched = paginator.pages_fetched();
        }

        stats.cleanup = self.executor.cleanup(record).await;
        Ok(stats)
    }

    async fn process_page(
        &self,
        pair: &RepoPair,
        index: &DestinationIndex,
        tags: Vec<HubTag>,
        record: &mut TransferRecord,
        stats: &mut RepoStats,
    ) -> Result<PageFlow> {
        for tag in tags {
            stats.tags_seen += 1;

            let Some(image) = select_image(&tag.images, &self.options.platform) else {
                stats.tags_skipped += 1;
                continue;
            };
            stats.tags_eligible += 1;
            let digest = image.digest.as_deref();

            let decision = decide(index, &tag.name, digest, || {
                TransferPlan::new(
                    &pair.source,
                    &self.options.ecr_registry,
                    &pair.destination,
                    &tag.name,
                    digest,
                )
            });

            match decision {
                SyncDecision::InSync => {
                    stats.in_sync += 1;
                    self.logger.info(&format!(
                        "Image {}:{} is in sync with {}/{}:{}.",
                        pair.source, tag.name, self.options.ecr_registry, pair.destination, tag.name
                    ));
                }
                SyncDecision::NeedsSync(plan) => {
                    stats.out_of_sync += 1;
                    if self.options.dry_run {
                        self.logger.info(&format!(
                            "Dry run: would sync {} to {}",
                            plan.source_ref, plan.destination_ref
                        ));
                    } else {
                        self.executor.transfer(&plan, record).await?;
                        stats.synced += 1;
                    }
                }
            }

            if self
                .options
                .tag_limit
                .is_some_and(|limit| stats.tags_eligible >= limit)
            {
                return Ok(PageFlow::LimitReached);
            }
        }
        Ok(PageFlow::Continue)
    }
}
