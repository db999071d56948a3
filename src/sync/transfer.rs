//! Image transfer through the local container CLI, and cleanup of what it leaves behind

use crate::error::Result;
use crate::logging::Logger;
use crate::process::CommandRunner;
use crate::sync::decision::TransferPlan;
use async_trait::async_trait;

/// The local container tooling, invoked one command at a time
#[async_trait]
pub trait ContainerCli: Send + Sync {
    async fn exec(&self, args: &[String]) -> Result<()>;
}

/// `ContainerCli` backed by the `docker` binary
pub struct DockerCli {
    runner: CommandRunner,
}

impl DockerCli {
    pub fn new(runner: CommandRunner) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl ContainerCli for DockerCli {
    async fn exec(&self, args: &[String]) -> Result<()> {
        self.runner.run(args).await.map(|_| ())
    }
}

/// Image references materialised locally while reconciling one repository pair
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TransferRecord {
    references: Vec<String>,
}

impl TransferRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, plan: &TransferPlan) {
        self.references.push(plan.destination_ref.clone());
        self.references.push(plan.source_ref.clone());
    }

    pub fn references(&self) -> &[String] {
        &self.references
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    Skipped,
    Removed(usize),
    Failed(usize),
}

pub struct TransferExecutor<'a> {
    cli: &'a dyn ContainerCli,
    logger: Logger,
}

impl<'a> TransferExecutor<'a> {
    pub fn new(cli: &'a dyn ContainerCli, logger: Logger) -> Self {
        Self { cli, logger }
    }

    /// Pull, retag and push one image. Each step must succeed before the next starts;
    /// the references are only recorded once the push went through.
    pub async fn transfer(&self, plan: &TransferPlan, record: &mut TransferRecord) -> Result<()> {
        self.logger.step(&format!(
            "Syncing image {} to {}",
            plan.source_ref, plan.destination_ref
        ));

        self.cli
            .exec(&["pull".to_string(), plan.source_ref.clone()])
            .await?;
        self.cli
            .exec(&[
                "tag".to_string(),
                plan.source_ref.clone(),
                plan.destination_ref.clone(),
            ])
            .await?;
        self.cli
            .exec(&["push".to_string(), plan.destination_ref.clone()])
            .await?;

        record.record(plan);
        Ok(())
    }

    /// Remove every recorded reference in one call. Failures are logged, never returned.
    pub async fn cleanup(&self, record: TransferRecord) -> CleanupOutcome {
        if record.is_empty() {
            return CleanupOutcome::Skipped;
        }

        for reference in record.references() {
            self.logger.debug(&format!("Deleting {}", reference));
        }

        let mut args = vec!["image".to_string(), "rm".to_string()];
        args.extend(record.references.iter().cloned());

        match self.cli.exec(&args).await {
            Ok(()) => CleanupOutcome::Removed(record.len()),
            Err(e) => {
                self.logger.warning(&format!("Failed to remove local images: {}", e));
                CleanupOutcome::Failed(record.len())
            }
        }
    }
}
