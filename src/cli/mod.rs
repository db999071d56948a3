//! Command line interface module
//!
//! Argument parsing and the runner that wires the reconciler to docker, the AWS CLI and
//! Docker Hub.

pub mod args;
pub mod runner;

pub use args::Args;
pub use runner::Runner;
