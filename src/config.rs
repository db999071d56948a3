//! Run configuration and repository mapping
//!
//! The repository mapping file is a JSON object of `"dockerhub-repo": "ecr-repo"` entries.
//! Pairs are kept in file order so runs are reproducible.

use crate::error::{MirrorError, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const DEFAULT_NAMESPACE: &str = "library";
pub const DEFAULT_HUB_URL: &str = "https://hub.docker.com";

/// One Docker Hub repository mirrored into one ECR repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPair {
    /// Namespace-qualified Docker Hub name, e.g. `library/nginx`
    pub source: String,
    pub destination: String,
}

impl RepoPair {
    pub fn new(source: &str, destination: &str) -> Self {
        Self {
            source: qualify_source(source),
            destination: destination.to_string(),
        }
    }
}

/// Official images live under `library/` on Docker Hub.
pub fn qualify_source(name: &str) -> String {
    if name.contains('/') {
        name.to_string()
    } else {
        format!("{}/{}", DEFAULT_NAMESPACE, name)
    }
}

/// Target platform of the single image taken from each tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub architecture: String,
    pub os: String,
}

impl Platform {
    pub fn new(architecture: impl Into<String>, os: impl Into<String>) -> Self {
        Self {
            architecture: architecture.into(),
            os: os.into(),
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::new("amd64", "linux")
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.os, self.architecture)
    }
}

/// Parse the tag limit input. Anything that is not a non-negative integer means unlimited.
pub fn parse_tag_limit(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok()
}

/// Options that shape how every repository pair is reconciled
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Registry host prefix for destination references, e.g. `123.dkr.ecr.us-east-1.amazonaws.com`
    pub ecr_registry: String,
    pub tag_limit: Option<usize>,
    pub platform: Platform,
    pub dry_run: bool,
}

impl SyncOptions {
    pub fn new(ecr_registry: impl Into<String>) -> Self {
        Self {
            ecr_registry: ecr_registry.into(),
            tag_limit: None,
            platform: Platform::default(),
            dry_run: false,
        }
    }

    pub fn with_tag_limit(mut self, tag_limit: Option<usize>) -> Self {
        self.tag_limit = tag_limit;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Fully resolved configuration for a run
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    pub repo_file: PathBuf,
    pub sync: SyncOptions,
    pub hub_url: String,
    pub docker_bin: String,
    pub aws_bin: String,
    /// Applies to the container CLI only
    pub fail_on_stderr: bool,
}

impl MirrorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sync.ecr_registry.trim().is_empty() {
            return Err(MirrorError::Config(
                "ecr_registry cannot be empty".to_string(),
            ));
        }
        if self.repo_file.as_os_str().is_empty() {
            return Err(MirrorError::Config("repo_file cannot be empty".to_string()));
        }
        if self.sync.platform.architecture.is_empty() || self.sync.platform.os.is_empty() {
            return Err(MirrorError::Config(
                "target architecture and os must be set".to_string(),
            ));
        }
        if !self.hub_url.starts_with("http://") && !self.hub_url.starts_with("https://") {
            return Err(MirrorError::Config(format!(
                "Invalid Docker Hub URL: {}. Must start with http:// or https://",
                self.hub_url
            )));
        }
        Ok(())
    }
}

/// Read and parse the repository mapping file.
pub fn load_repo_pairs(path: &Path) -> Result<Vec<RepoPair>> {
    let raw = std::fs::read(path).map_err(|e| {
        MirrorError::Config(format!("Cannot read repo file {}: {}", path.display(), e))
    })?;
    let text = String::from_utf8(raw).map_err(|e| {
        MirrorError::Config(format!("Repo file {} is not UTF-8: {}", path.display(), e))
    })?;
    parse_repo_pairs(&text)
}

pub fn parse_repo_pairs(text: &str) -> Result<Vec<RepoPair>> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(entries) = value else {
        return Err(MirrorError::Config(
            "Repo file must contain a JSON object mapping source to destination".to_string(),
        ));
    };

    entries
        .iter()
        .map(|(source, destination)| {
            let destination = destination.as_str().ok_or_else(|| {
                MirrorError::Config(format!(
                    "Destination for '{}' must be a string, got {}",
                    source, destination
                ))
            })?;
            if source.trim().is_empty() || destination.trim().is_empty() {
                return Err(MirrorError::Config(format!(
                    "Empty repository name in mapping '{}' -> '{}'",
                    source, destination
                )));
            }
            Ok(RepoPair::new(source, destination))
        })
        .collect()
}
