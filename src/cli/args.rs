//! Command-line argument parsing
//!
//! Every input can also come from the `INPUT_*` variables GitHub Actions sets for an
//! action's `with:` block.

use crate::config::{DEFAULT_HUB_URL, MirrorConfig, Platform, SyncOptions, parse_tag_limit};
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hub-ecr-mirror")]
#[command(about = "Mirror Docker Hub repositories into AWS ECR, one platform per tag")]
#[command(version)]
pub struct Args {
    /// ECR registry host, e.g. 123456789012.dkr.ecr.eu-west-1.amazonaws.com
    #[arg(long = "ecr-registry", env = "INPUT_ECR_REGISTRY")]
    pub ecr_registry: String,

    /// JSON file mapping Docker Hub repositories to ECR repositories
    #[arg(long = "repo-file", env = "INPUT_REPO_FILE")]
    pub repo_file: PathBuf,

    /// Maximum number of platform-matching tags to check per repository.
    /// Anything that is not a number means no limit.
    #[arg(long = "tag-limit", env = "INPUT_TAG_LIMIT", default_value = "")]
    pub tag_limit: String,

    /// Target CPU architecture
    #[arg(long = "architecture", default_value = "amd64")]
    pub architecture: String,

    /// Target operating system
    #[arg(long = "os", default_value = "linux")]
    pub os: String,

    /// Report what would be synced without pulling or pushing anything
    #[arg(long = "dry-run", short = 'n')]
    pub dry_run: bool,

    /// Do not treat output on stderr from docker as a failure
    #[arg(long = "allow-stderr")]
    pub allow_stderr: bool,

    /// Container CLI binary
    #[arg(long = "docker-bin", default_value = "docker")]
    pub docker_bin: String,

    /// AWS CLI binary
    #[arg(long = "aws-bin", default_value = "aws")]
    pub aws_bin: String,

    /// Docker Hub API base URL
    #[arg(long = "hub-url", default_value = DEFAULT_HUB_URL)]
    pub hub_url: String,

    /// Verbose output
    #[arg(long = "verbose", short = 'v')]
    pub verbose: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Resolve into a validated configuration
    pub fn into_config(self) -> Result<MirrorConfig> {
        let sync = SyncOptions::new(self.ecr_registry.trim_end_matches('/'))
            .with_tag_limit(parse_tag_limit(&self.tag_limit))
            .with_platform(Platform::new(self.architecture, self.os))
            .with_dry_run(self.dry_run);

        let config = MirrorConfig {
            repo_file: self.repo_file,
            sync,
            hub_url: self.hub_url,
            docker_bin: self.docker_bin,
            aws_bin: self.aws_bin,
            fail_on_stderr: !self.allow_stderr,
        };
        config.validate()?;
        Ok(config)
    }
}
