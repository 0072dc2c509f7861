//! Tab-separated corpus sinks
//!
//! One sink exists per (language pair, partition) and owns that pair's
//! output file. Writers from different work units may target the same sink
//! concurrently; the per-sink mutex plus a single buffered write per batch
//! guarantee that no line is ever interleaved or partially written. No
//! ordering is guaranteed across units.

use crate::crawler::AlignedPair;
use crate::lang::LanguagePair;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Errors raised while appending to a corpus file
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Append-only sink for one (language pair, partition) corpus file
#[derive(Debug)]
pub struct CorpusSink {
    path: PathBuf,
    lock: Mutex<()>,
}

impl CorpusSink {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// The file this sink appends to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a batch of aligned pairs as tab-separated lines
    ///
    /// The whole batch is serialized first and written with a single call
    /// under the sink lock, so records from concurrent writers never
    /// interleave. Text is written as-is: extraction already guarantees no
    /// embedded tabs or newlines.
    pub async fn append(&self, pairs: &[AlignedPair]) -> Result<(), WriteError> {
        let mut batch = String::new();
        for pair in pairs {
            batch.push_str(&pair.text1);
            batch.push('\t');
            batch.push_str(&pair.text2);
            batch.push('\n');
        }

        let _guard = self.lock.lock().await;

        let io_err = |source| WriteError::Io {
            path: self.path.clone(),
            source,
        };

        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .await
            .map_err(io_err)?;

        file.write_all(batch.as_bytes()).await.map_err(io_err)?;
        file.flush().await.map_err(io_err)
    }
}

/// Owns one sink per (language pair, partition)
///
/// All sinks are created up front from the configured cross product, so
/// lookup during the crawl is infallible for known keys and does no I/O.
pub struct SinkRegistry {
    sinks: HashMap<(String, String), Arc<CorpusSink>>,
}

impl SinkRegistry {
    /// Builds the registry for every pair × partition combination
    ///
    /// File names are deterministic: `{code1}-{code2}-{partition}.tsv`
    /// under the output directory, with the pair codes in configuration
    /// order.
    pub fn new(directory: &Path, pairs: &[LanguagePair], partitions: &[String]) -> Self {
        let mut sinks = HashMap::new();
        for pair in pairs {
            for partition in partitions {
                let file = format!("{}-{}.tsv", pair.file_stem(), partition);
                sinks.insert(
                    (pair.file_stem(), partition.clone()),
                    Arc::new(CorpusSink::new(directory.join(file))),
                );
            }
        }
        Self { sinks }
    }

    /// Looks up the sink for a pair and partition
    pub fn get(&self, pair: &LanguagePair, partition: &str) -> Option<Arc<CorpusSink>> {
        self.sinks
            .get(&(pair.file_stem(), partition.to_string()))
            .cloned()
    }

    /// Number of registered sinks
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}
