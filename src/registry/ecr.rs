//! Destination side: image listing for AWS ECR repositories
//!
//! Listing goes through the AWS CLI (`aws ecr list-images`) so credentials, region and
//! profile resolution behave exactly as they do for the rest of the pipeline.

use crate::error::{MirrorError, Result};
use crate::logging::Logger;
use crate::process::CommandRunner;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

const LIST_IMAGES_PAGE_SIZE: usize = 1000;

/// One image identifier as reported by `ListImages`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageId {
    pub image_tag: Option<String>,
    pub image_digest: Option<String>,
}

impl ImageId {
    pub fn tagged(tag: &str, digest: &str) -> Self {
        Self {
            image_tag: Some(tag.to_string()),
            image_digest: Some(digest.to_string()),
        }
    }
}

/// One page of `ListImages` output
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImagePage {
    #[serde(rename = "imageIds", default)]
    pub image_ids: Vec<ImageId>,
    #[serde(rename = "nextToken", alias = "NextToken", default)]
    pub next_token: Option<String>,
}

/// Paged image listing for a destination repository
#[async_trait]
pub trait DestinationRegistry: Send + Sync {
    async fn list_images(&self, repository: &str, next_token: Option<&str>) -> Result<ImagePage>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationImageRecord {
    pub tag: String,
    pub digest: String,
}

/// Tag to image mapping for a destination repository, rebuilt for every pair
#[derive(Debug, Clone, Default)]
pub struct DestinationIndex {
    images: HashMap<String, DestinationImageRecord>,
}

impl DestinationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an image id. Ids missing a tag or a digest are ignored; a repeated tag replaces
    /// the earlier entry.
    pub fn insert(&mut self, image_id: ImageId) {
        if let (Some(tag), Some(digest)) = (image_id.image_tag, image_id.image_digest) {
            self.images
                .insert(tag.clone(), DestinationImageRecord { tag, digest });
        }
    }

    pub fn get(&self, tag: &str) -> Option<&DestinationImageRecord> {
        self.images.get(tag)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl FromIterator<ImageId> for DestinationIndex {
    fn from_iter<I: IntoIterator<Item = ImageId>>(iter: I) -> Self {
        let mut index = DestinationIndex::new();
        for image_id in iter {
            index.insert(image_id);
        }
        index
    }
}

/// Enumerate every tagged image in `repository`, following pages until exhausted.
pub async fn build_destination_index(
    registry: &dyn DestinationRegistry,
    repository: &str,
) -> Result<DestinationIndex> {
    let mut index = DestinationIndex::new();
    let mut next_token: Option<String> = None;

    loop {
        let page = registry
            .list_images(repository, next_token.as_deref())
            .await?;
        for image_id in page.image_ids {
            index.insert(image_id);
        }

        match page.next_token {
            Some(token) if !token.is_empty() => next_token = Some(token),
            _ => break,
        }
    }

    Ok(index)
}

/// `DestinationRegistry` backed by the AWS CLI
pub struct AwsCliEcr {
    runner: CommandRunner,
    logger: Logger,
}

impl AwsCliEcr {
    pub fn new(runner: CommandRunner, logger: Logger) -> Self {
        Self { runner, logger }
    }

    fn list_images_args(repository: &str, next_token: Option<&str>) -> Vec<String> {
        let mut args = vec![
            "ecr".to_string(),
            "list-images".to_string(),
            "--repository-name".to_string(),
            repository.to_string(),
            "--max-items".to_string(),
            LIST_IMAGES_PAGE_SIZE.to_string(),
            "--output".to_string(),
            "json".to_string(),
        ];
        if let Some(token) = next_token {
            args.push("--starting-token".to_string());
            args.push(token.to_string());
        }
        args
    }
}

#[async_trait]
impl DestinationRegistry for AwsCliEcr {
    async fn list_images(&self, repository: &str, next_token: Option<&str>) -> Result<ImagePage> {
        self.logger.debug(&format!("Listing ECR images for {}", repository));

        let args = Self::list_images_args(repository, next_token);
        let stdout = self.runner.run(&args).await?;
        parse_list_images_output(&stdout)
    }
}

pub fn parse_list_images_output(stdout: &str) -> Result<ImagePage> {
    if stdout.trim().is_empty() {
        return Ok(ImagePage::default());
    }
    serde_json::from_str(stdout).map_err(|e| {
        MirrorError::Destination(format!("Failed to parse list-images output: {}", e))
    })
}
