//! Registry module for the two sides of a mirror
//!
//! `dockerhub` lists source tags over the Docker Hub HTTP API, `ecr` lists what the
//! destination repository already holds.

pub mod dockerhub;
pub mod ecr;

pub use dockerhub::{DockerHubClient, HubTag, SourceRegistry, TagImage, TagPage, TagPaginator};
pub use ecr::{
    AwsCliEcr, DestinationImageRecord, DestinationIndex, DestinationRegistry, ImageId, ImagePage,
    build_destination_index,
};
