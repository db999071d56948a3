//! Logging and output control
//!
//! This module provides the [`Logger`] used for all user-visible output. Messages are
//! emitted as `tracing` events so the subscriber installed by the binary decides the
//! final format and filtering. When running inside GitHub Actions, fatal errors are
//! also written as workflow commands so they surface as annotations.

use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const GITHUB_ACTIONS_ENV: &str = "GITHUB_ACTIONS";
const RUNNER_DEBUG_ENV: &str = "RUNNER_DEBUG";

/// Logger responsible for all user-visible output
#[derive(Debug, Clone)]
pub struct Logger {
    pub verbose: bool,
    pub github_actions: bool,
    pub start_time: Instant,
}

impl Logger {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            github_actions: false,
            start_time: Instant::now(),
        }
    }

    /// Build a logger from the host environment, honouring the Actions debug switch.
    pub fn from_env(verbose: bool) -> Self {
        let github_actions = std::env::var(GITHUB_ACTIONS_ENV)
            .map(|v| v == "true")
            .unwrap_or(false);
        let runner_debug = std::env::var(RUNNER_DEBUG_ENV)
            .map(|v| v == "1")
            .unwrap_or(false);

        Self {
            verbose: verbose || runner_debug,
            github_actions,
            start_time: Instant::now(),
        }
    }

    /// Install the global `tracing` subscriber. `RUST_LOG` wins over the verbosity flag.
    pub fn init_subscriber(&self) {
        let default_filter = if self.verbose {
            "hub_ecr_mirror=debug"
        } else {
            "hub_ecr_mirror=info"
        };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    }

    /// Main section heading
    pub fn section(&self, title: &str) {
        tracing::info!("=== {} ===", title);
    }

    pub fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    pub fn success(&self, message: &str) {
        tracing::info!("✅ {}", message);
    }

    /// Step information
    pub fn step(&self, message: &str) {
        tracing::info!("▶️  {}", message);
    }

    pub fn debug(&self, message: &str) {
        tracing::debug!("{}", message);
    }

    /// Detailed information (only shown in verbose mode)
    pub fn detail(&self, message: &str) {
        tracing::debug!("   {}", message);
    }

    pub fn warning(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    pub fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }

    /// Report a run-ending failure. Inside Actions this also marks the step as failed.
    pub fn fatal(&self, message: &str) {
        self.error(message);
        if self.github_actions {
            println!("::error::{}", escape_workflow_data(message));
        }
    }

    /// Key-value pair summary display
    pub fn summary_kv(&self, title: &str, items: &[(&str, String)]) {
        self.section(title);
        for (key, value) in items {
            tracing::info!("  {}: {}", key, value);
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Format duration in human-readable format
    pub fn format_duration(&self, duration: Duration) -> String {
        let secs = duration.as_secs();
        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m{}s", secs / 60, secs % 60)
        } else {
            format!("{}h{}m{}s", secs / 3600, (secs % 3600) / 60, secs % 60)
        }
    }
}

/// Workflow command payloads must not contain raw newlines or percent signs.
fn escape_workflow_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
