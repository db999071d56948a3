//! Source side: tag listing from the Docker Hub v2 API
//!
//! Tags are requested most-recently-updated first so that a tag limit keeps the freshest
//! tags. Pages are followed through the `next` URL returned by Docker Hub, verbatim.

use crate::error::{MirrorError, Result};
use crate::logging::Logger;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

pub const TAGS_PAGE_SIZE: usize = 100;
pub const TAGS_ORDERING: &str = "last_updated";

/// A single platform-specific image within a tag
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagImage {
    #[serde(default)]
    pub architecture: String,
    #[serde(default)]
    pub os: String,
    /// Absent for images Docker Hub has not finished indexing
    #[serde(default)]
    pub digest: Option<String>,
}

impl TagImage {
    pub fn new(architecture: &str, os: &str, digest: &str) -> Self {
        Self {
            architecture: architecture.to_string(),
            os: os.to_string(),
            digest: Some(digest.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HubTag {
    pub name: String,
    #[serde(default)]
    pub images: Vec<TagImage>,
}

impl HubTag {
    pub fn new(name: &str, images: Vec<TagImage>) -> Self {
        Self {
            name: name.to_string(),
            images,
        }
    }
}

/// One page of `GET /v2/repositories/{repo}/tags`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagPage {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub results: Vec<HubTag>,
}

/// Fetches a page of tags from an absolute URL
#[async_trait]
pub trait SourceRegistry: Send + Sync {
    async fn fetch_tags(&self, url: &str) -> Result<TagPage>;
}

/// Build the first-page URL for a namespace-qualified repository.
pub fn initial_tags_url(hub_url: &str, repository: &str) -> Result<Url> {
    let mut url = Url::parse(hub_url)?;
    {
        let mut segments = url.path_segments_mut().map_err(|_| {
            MirrorError::Config(format!("Docker Hub URL cannot be a base: {}", hub_url))
        })?;
        segments.pop_if_empty().push("v2").push("repositories");
        for part in repository.split('/').filter(|p| !p.is_empty()) {
            segments.push(part);
        }
        segments.push("tags");
    }
    url.query_pairs_mut()
        .append_pair("page_size", &TAGS_PAGE_SIZE.to_string())
        .append_pair("ordering", TAGS_ORDERING);
    Ok(url)
}

/// `SourceRegistry` talking to Docker Hub over HTTPS
pub struct DockerHubClient {
    client: Client,
    logger: Logger,
}

impl DockerHubClient {
    pub fn new(logger: Logger) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, logger })
    }
}

#[async_trait]
impl SourceRegistry for DockerHubClient {
    async fn fetch_tags(&self, url: &str) -> Result<TagPage> {
        self.logger.debug(&format!("GET {}", url));

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MirrorError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

enum Cursor {
    Next(String),
    Exhausted,
}

/// Lazy walk over a repository's tag pages. Each call to [`TagPaginator::next_page`]
/// performs at most one request; the walk ends when a page has no `next` link.
pub struct TagPaginator<'a> {
    source: &'a dyn SourceRegistry,
    cursor: Cursor,
    pages_fetched: usize,
}

impl<'a> TagPaginator<'a> {
    pub fn new(source: &'a dyn SourceRegistry, hub_url: &str, repository: &str) -> Result<Self> {
        let first = initial_tags_url(hub_url, repository)?;
        Ok(Self {
            source,
            cursor: Cursor::Next(first.into()),
            pages_fetched: 0,
        })
    }

    pub async fn next_page(&mut self) -> Result<Option<Vec<HubTag>>> {
        let url = match std::mem::replace(&mut self.cursor, Cursor::Exhausted) {
            Cursor::Next(url) => url,
            Cursor::Exhausted => return Ok(None),
        };

        let page = self.source.fetch_tags(&url).await?;
        self.pages_fetched += 1;

        if let Some(next) = page.next.filter(|n| !n.is_empty()) {
            self.cursor = Cursor::Next(next);
        }

        Ok(Some(page.results))
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}
