//! Error handling module for the mirror

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Request to {url} failed with status {status}")]
    Http { url: String, status: u16 },
    #[error("`{program} {args}` failed: {message}")]
    Command {
        program: String,
        args: String,
        message: String,
    },
    #[error("Destination registry error: {0}")]
    Destination(String),
}

impl MirrorError {
    pub fn command(program: &str, args: &[String], message: impl Into<String>) -> Self {
        MirrorError::Command {
            program: program.to_string(),
            args: args.join(" "),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MirrorError>;
