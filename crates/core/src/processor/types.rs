//! Types for the processor module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{Config, ProgrammeConfig};
use crate::settings::{EndTrim, ItemOverrides};

/// One bulletin to process: where it comes from and where it is published.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingRequest {
    input_path: PathBuf,
    destination_path: PathBuf,
    overrides: Option<ItemOverrides>,
}

impl ProcessingRequest {
    pub fn new(input_path: impl Into<PathBuf>, destination_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            destination_path: destination_path.into(),
            overrides: None,
        }
    }

    /// Attaches per-item settings that win over the global audio config.
    pub fn with_overrides(mut self, overrides: ItemOverrides) -> Self {
        self.overrides = Some(overrides);
        self
    }

    /// Builds the request for a configured programme.
    ///
    /// The destination is `output.base_path/<output_name>.<extension>` and the
    /// programme's trims become the item overrides.
    pub fn for_programme(
        config: &Config,
        programme: &ProgrammeConfig,
        input_path: impl Into<PathBuf>,
    ) -> Self {
        let overrides = programme.overrides();
        let request = Self::new(input_path, config.destination_for(programme));
        if overrides == ItemOverrides::default() {
            request
        } else {
            request.with_overrides(overrides)
        }
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn destination_path(&self) -> &Path {
        &self.destination_path
    }

    pub fn overrides(&self) -> Option<&ItemOverrides> {
        self.overrides.as_ref()
    }
}

/// How a successful call ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcessOutcome {
    /// This call transcoded and published the destination.
    Published {
        size_bytes: u64,
        duration_ms: u64,
        end_trim: EndTrim,
    },
    /// The destination already existed; nothing was done.
    AlreadyPresent,
    /// Another attempt holds the destination lock.
    Deferred,
}

impl ProcessOutcome {
    /// Short label used in reports and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Published { .. } => "published",
            Self::AlreadyPresent => "already_present",
            Self::Deferred => "deferred",
        }
    }
}

/// Label used for attempts that ended in a pipeline error.
pub const FAILED_LABEL: &str = "failed";

/// Result for one item of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemReport {
    pub destination: PathBuf,
    /// `published`, `already_present`, `deferred` or `failed`.
    pub outcome: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of one sequential run over a set of requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub items: Vec<ItemReport>,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchReport {
    /// A run succeeds when at least one item succeeded.
    pub fn is_success(&self) -> bool {
        self.succeeded > 0
    }

    /// Items with the given outcome label.
    pub fn count_outcome(&self, label: &str) -> usize {
        self.items.iter().filter(|i| i.outcome == label).count()
    }
}

/// Totals accumulated across runs by a long-lived caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunTotals {
    pub total_runs: u64,
    pub successful_runs: u64,
    pub failed_runs: u64,
    pub items_published: u64,
    pub items_deferred: u64,
    pub items_failed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run: Option<DateTime<Utc>>,
}

impl RunTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one run into the totals.
    pub fn record(&mut self, report: &BatchReport) {
        self.total_runs += 1;
        if report.is_success() {
            self.successful_runs += 1;
        } else {
            self.failed_runs += 1;
        }
        self.items_published += report.count_outcome("published") as u64;
        self.items_deferred += (report.count_outcome("deferred")
            + report.count_outcome("already_present")) as u64;
        self.items_failed += report.failed as u64;
        self.last_run = Some(report.finished_at);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
