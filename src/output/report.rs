//! End-of-run accounting
//!
//! A unit failure never aborts the run; it lands here instead, so the full
//! failure list can be reported once everything that could complete has.

use chrono::{DateTime, Utc};

/// One failed work unit
#[derive(Debug, Clone)]
pub struct UnitFailure {
    /// Partition the unit belonged to
    pub partition: String,

    /// Language pair, e.g. "zh-tru"
    pub pair: String,

    /// Resolved document URL (or the raw template when resolution failed)
    pub url: String,

    /// Rendered stage error
    pub message: String,
}

/// Summary of a completed crawl run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Total units in the dispatched cross product
    pub units_total: u64,

    /// Units that ran all four stages to completion
    pub units_completed: u64,

    /// Units never dispatched because the run was cancelled
    pub units_skipped: u64,

    /// Aligned pairs appended across all sinks
    pub pairs_written: u64,

    pub failures: Vec<UnitFailure>,
}

impl RunReport {
    pub fn new(units_total: u64) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            units_total,
            units_completed: 0,
            units_skipped: 0,
            pairs_written: 0,
            failures: Vec::new(),
        }
    }

    /// Records a unit that completed, with the number of pairs it wrote
    pub fn record_success(&mut self, pairs_written: u64) {
        self.units_completed += 1;
        self.pairs_written += pairs_written;
    }

    /// Records a failed unit
    pub fn record_failure(&mut self, failure: UnitFailure) {
        self.failures.push(failure);
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Number of failed units
    pub fn units_failed(&self) -> u64 {
        self.failures.len() as u64
    }

    /// Elapsed wall-clock seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Logs the end-of-run accounting
    pub fn log_summary(&self) {
        tracing::info!(
            "Run finished: {}/{} units completed, {} failed, {} skipped, {} pairs written",
            self.units_completed,
            self.units_total,
            self.units_failed(),
            self.units_skipped,
            self.pairs_written
        );

        if let Some(seconds) = self.duration_seconds() {
            tracing::info!("Elapsed: {}s", seconds);
        }

        for failure in &self.failures {
            tracing::warn!(
                "Failed unit [{} {}] {}: {}",
                failure.partition,
                failure.pair,
                failure.url,
                failure.message
            );
        }
    }
}
