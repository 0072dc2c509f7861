//! Crawl orchestration
//!
//! The unit of work is one (partition, language pair, document) triple.
//! The coordinator materializes the full cross product up front, then
//! drives every unit through fetch → extract → align → append on a
//! bounded worker pool. A unit failure is logged and aggregated, never
//! fatal: one bad document must not abort a multi-hour crawl.

use crate::config::{load_documents, Config, DocumentRef};
use crate::crawler::aligner::align;
use crate::crawler::extractor::{extract_verses, ExtractError};
use crate::crawler::fetcher::{build_http_client, FetchError, Fetcher};
use crate::lang::LanguagePair;
use crate::output::{RunReport, SinkRegistry, UnitFailure, WriteError};
use crate::{UrlError, WeaveError};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// User-Agent sent with every request
const USER_AGENT: &str = concat!("verseweave/", env!("CARGO_PKG_VERSION"));

/// Completed units between progress log lines
const PROGRESS_INTERVAL: u64 = 25;

/// A stage failure inside one work unit
#[derive(Debug, Error)]
pub enum UnitError {
    #[error("{0}")]
    Url(#[from] UrlError),

    #[error("{0}")]
    Fetch(#[from] FetchError),

    #[error("{0}")]
    Extract(#[from] ExtractError),

    #[error("{0}")]
    Write(#[from] WriteError),

    #[error("no sink registered for pair {pair} in partition {partition}")]
    UnknownSink { pair: String, partition: String },
}

/// One (partition, pair, document) triple
#[derive(Debug, Clone)]
struct WorkUnit {
    partition: String,
    pair: LanguagePair,
    document: DocumentRef,
}

/// Identifies a unit in logs and the failure report
#[derive(Debug, Clone)]
struct UnitDescriptor {
    partition: String,
    pair: String,
    url: String,
}

/// Main crawl coordinator
pub struct Coordinator {
    config: Arc<Config>,
    fetcher: Fetcher,
    sinks: Arc<SinkRegistry>,
    units: Vec<WorkUnit>,
}

impl Coordinator {
    /// Creates a coordinator from a validated configuration
    ///
    /// Loads every partition's document list, enumerates the language
    /// pairs, creates the output directory and sink registry, and
    /// materializes the work-unit cross product in dispatch order:
    /// partition, then pair, then document.
    pub fn new(config: Config) -> Result<Self, WeaveError> {
        let pairs = LanguagePair::enumerate(&config.languages);
        tracing::info!(
            "{} languages form {} pairs across {} partitions",
            config.languages.len(),
            pairs.len(),
            config.partitions.len()
        );

        let output_dir = Path::new(&config.output.directory);
        std::fs::create_dir_all(output_dir)?;

        let partition_names: Vec<String> =
            config.partitions.iter().map(|p| p.name.clone()).collect();
        let sinks = Arc::new(SinkRegistry::new(output_dir, &pairs, &partition_names));

        let mut units = Vec::new();
        for partition in &config.partitions {
            let documents = load_documents(Path::new(&partition.documents))?;
            tracing::info!(
                "Partition '{}': {} documents",
                partition.name,
                documents.len()
            );

            for pair in &pairs {
                for document in &documents {
                    units.push(WorkUnit {
                        partition: partition.name.clone(),
                        pair: pair.clone(),
                        document: document.clone(),
                    });
                }
            }
        }

        let client = build_http_client(USER_AGENT)?;
        let fetcher = Fetcher::new(
            client,
            Duration::from_millis(config.crawler.politeness_delay_ms),
        );

        Ok(Self {
            config: Arc::new(config),
            fetcher,
            sinks,
            units,
        })
    }

    /// Total number of work units in the cross product
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Runs every work unit to completion on a bounded worker pool
    ///
    /// At most `worker_pool_size` units are in flight at once; a permit is
    /// acquired before each spawn, so the pool also backpressures
    /// dispatch. Cancelling the token stops dispatching new units while
    /// in-flight units finish and are still accounted for.
    pub async fn run(self, cancel: CancellationToken) -> Result<RunReport, WeaveError> {
        let total = self.units.len();
        let mut report = RunReport::new(total as u64);
        let start = Instant::now();

        tracing::info!(
            "Dispatching {} units on {} workers",
            total,
            self.config.crawler.worker_pool_size
        );

        let semaphore = Arc::new(Semaphore::new(
            self.config.crawler.worker_pool_size as usize,
        ));
        let mut tasks: JoinSet<(UnitDescriptor, Result<u64, UnitError>)> = JoinSet::new();
        let mut dispatched: usize = 0;

        for unit in self.units {
            if cancel.is_cancelled() {
                tracing::info!(
                    "Cancellation requested; {} units not dispatched",
                    total - dispatched
                );
                break;
            }

            // A closed semaphore behaves like cancellation; it never
            // closes in practice.
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };
            dispatched += 1;

            let fetcher = self.fetcher.clone();
            let marker = self.config.crawler.continuation_marker.clone();
            let sinks = Arc::clone(&self.sinks);

            tasks.spawn(async move {
                let _permit = permit;
                process_unit(fetcher, marker, sinks, unit).await
            });

            // Account for finished units as we go so progress stays live
            while let Some(joined) = tasks.try_join_next() {
                record_outcome(&mut report, joined, start);
            }
        }

        report.units_skipped = (total - dispatched) as u64;

        // Drain in-flight units
        while let Some(joined) = tasks.join_next().await {
            record_outcome(&mut report, joined, start);
        }

        report.finish();
        Ok(report)
    }
}

/// Folds one task outcome into the report and logs progress
fn record_outcome(
    report: &mut RunReport,
    joined: Result<(UnitDescriptor, Result<u64, UnitError>), tokio::task::JoinError>,
    start: Instant,
) {
    match joined {
        Ok((descriptor, Ok(pairs_written))) => {
            tracing::debug!(
                "[{} {}] {} -> {} pairs",
                descriptor.partition,
                descriptor.pair,
                descriptor.url,
                pairs_written
            );
            report.record_success(pairs_written);
        }
        Ok((descriptor, Err(error))) => {
            tracing::warn!(
                "[{} {}] {} failed: {}",
                descriptor.partition,
                descriptor.pair,
                descriptor.url,
                error
            );
            report.record_failure(UnitFailure {
                partition: descriptor.partition,
                pair: descriptor.pair,
                url: descriptor.url,
                message: error.to_string(),
            });
        }
        Err(join_error) => {
            tracing::error!("Worker task failed: {}", join_error);
            report.record_failure(UnitFailure {
                partition: String::new(),
                pair: String::new(),
                url: String::new(),
                message: join_error.to_string(),
            });
        }
    }

    let settled = report.units_completed + report.units_failed();
    if settled > 0 && settled % PROGRESS_INTERVAL == 0 {
        let rate = settled as f64 / start.elapsed().as_secs_f64();
        tracing::info!(
            "Progress: {}/{} units settled, {} pairs written, {:.2} units/sec",
            settled,
            report.units_total,
            report.pairs_written,
            rate
        );
    }
}

/// Runs the four-stage pipeline for one unit
///
/// Stages are strictly sequential within the unit; any stage error
/// short-circuits into the unit's failure record.
async fn process_unit(
    fetcher: Fetcher,
    marker: String,
    sinks: Arc<SinkRegistry>,
    unit: WorkUnit,
) -> (UnitDescriptor, Result<u64, UnitError>) {
    let mut descriptor = UnitDescriptor {
        partition: unit.partition.clone(),
        pair: unit.pair.to_string(),
        url: unit.document.template.clone(),
    };

    let result = async {
        let url = unit.document.resolve(&unit.pair)?;
        descriptor.url = url.to_string();

        let body = fetcher.fetch(&url).await?;

        let (frags1, frags2) = extract_verses(
            &body,
            &unit.pair.first.cell_class,
            &unit.pair.second.cell_class,
        )?;

        let (strip1, strip2) = unit.pair.space_stripping();
        let pairs = align(&frags1, &frags2, &marker, strip1, strip2);

        let sink = sinks
            .get(&unit.pair, &unit.partition)
            .ok_or_else(|| UnitError::UnknownSink {
                pair: unit.pair.to_string(),
                partition: unit.partition.clone(),
            })?;
        sink.append(&pairs).await?;

        Ok(pairs.len() as u64)
    }
    .await;

    (descriptor, result)
}

/// Builds a coordinator and runs the full crawl
///
/// # Arguments
///
/// * `config` - The validated crawler configuration
/// * `cancel` - Run-scoped cancellation signal; cancelling stops
///   dispatching new units and lets in-flight units finish
pub async fn crawl(config: Config, cancel: CancellationToken) -> Result<RunReport, WeaveError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run(cancel).await
}
