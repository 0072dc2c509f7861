//! Corpus output handling
//!
//! Aligned pairs flow to one append-only tab-separated file per
//! (language pair, partition); failures accumulate into a run report.

mod report;
mod sink;

pub use report::{RunReport, UnitFailure};
pub use sink::{CorpusSink, SinkRegistry, WriteError};
