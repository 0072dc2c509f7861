//! Crawl pipeline: fetch, extract, align, orchestrate
//!
//! Each work unit flows through the four stages in order; the coordinator
//! fans units out across a bounded worker pool.

mod aligner;
mod coordinator;
mod extractor;
mod fetcher;

pub use aligner::{align, AlignedPair};
pub use coordinator::{crawl, Coordinator, UnitError};
pub use extractor::{extract_verses, ExtractError};
pub use fetcher::{build_http_client, FetchError, Fetcher};
