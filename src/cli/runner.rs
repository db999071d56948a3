//! Runner wiring the configuration to the production collaborators

use crate::config::{MirrorConfig, load_repo_pairs};
use crate::error::Result;
use crate::logging::Logger;
use crate::process::CommandRunner;
use crate::registry::{AwsCliEcr, DockerHubClient};
use crate::sync::{DockerCli, Reconciler, RunSummary};

pub struct Runner {
    config: MirrorConfig,
    logger: Logger,
}

impl Runner {
    pub fn new(config: MirrorConfig, logger: Logger) -> Self {
        Self { config, logger }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let pairs = load_repo_pairs(&self.config.repo_file)?;
        self.logger.info(&format!(
            "Loaded {} repository pairs from {}",
            pairs.len(),
            self.config.repo_file.display()
        ));
        self.logger.detail(&format!(
            "Target registry: {}, platform: {}, tag limit: {}",
            self.config.sync.ecr_registry,
            self.config.sync.platform,
            self.config
                .sync
                .tag_limit
                .map_or_else(|| "none".to_string(), |l| l.to_string())
        ));
        if self.config.sync.dry_run {
            self.logger.info("Dry run mode - nothing will be pulled, pushed or removed");
        }

        let docker = self.container_cli();
        let ecr = self.destination_registry();
        let hub = DockerHubClient::new(self.logger.clone())?;

        let reconciler = Reconciler::new(
            &ecr,
            &hub,
            &docker,
            self.config.sync.clone(),
            self.logger.clone(),
        )
        .with_hub_url(self.config.hub_url.clone());

        let summary = reconciler.run(&pairs).await?;

        self.logger.summary_kv("Summary", &summary.summary_items());
        self.logger.success(&format!(
            "Mirror completed in {}",
            self.logger.format_duration(self.logger.elapsed())
        ));
        Ok(summary)
    }

    fn container_cli(&self) -> DockerCli {
        DockerCli::new(
            CommandRunner::new(&self.config.docker_bin, self.logger.clone())
                .with_fail_on_stderr(self.config.fail_on_stderr),
        )
    }

    /// The AWS CLI prints upgrade and credential notices on stderr, so only its exit
    /// status counts.
    fn destination_registry(&self) -> AwsCliEcr {
        AwsCliEcr::new(
            CommandRunner::new(&self.config.aws_bin, self.logger.clone()),
            self.logger.clone(),
        )
    }
}
