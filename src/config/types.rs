use crate::lang::LanguagePair;
use crate::UrlError;
use serde::Deserialize;
use url::Url;

/// Sentinel text the source layout uses for a verse that is typographically
/// merged into the previous verse.
pub const DEFAULT_CONTINUATION_MARKER: &str = "併於上節";

/// Delay slept after every fetch attempt unless configured otherwise
pub const DEFAULT_POLITENESS_DELAY_MS: u64 = 500;

/// Worker pool size unless configured otherwise
pub const DEFAULT_WORKER_POOL_SIZE: u32 = 10;

fn default_continuation_marker() -> String {
    DEFAULT_CONTINUATION_MARKER.to_string()
}

fn default_politeness_delay_ms() -> u64 {
    DEFAULT_POLITENESS_DELAY_MS
}

fn default_worker_pool_size() -> u32 {
    DEFAULT_WORKER_POOL_SIZE
}

/// Main configuration structure for verseweave
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
    #[serde(rename = "language", default)]
    pub languages: Vec<LanguageEntry>,
    #[serde(rename = "partition", default)]
    pub partitions: Vec<PartitionEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of concurrent work units in flight
    #[serde(rename = "worker-pool-size", default = "default_worker_pool_size")]
    pub worker_pool_size: u32,

    /// Delay slept after every fetch attempt (milliseconds)
    #[serde(
        rename = "politeness-delay-ms",
        default = "default_politeness_delay_ms"
    )]
    pub politeness_delay_ms: u64,

    /// Cell text meaning "merged into the previous verse"
    #[serde(
        rename = "continuation-marker",
        default = "default_continuation_marker"
    )]
    pub continuation_marker: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the per-pair corpus files
    pub directory: String,
}

/// One configured language of the source site
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageEntry {
    /// Short language code used in output file names (e.g. "zh")
    pub code: String,

    /// Value substituted for this language's placeholder in URL templates
    #[serde(rename = "url-token")]
    pub url_token: String,

    /// Class of the `td` cells holding this language's verses
    #[serde(rename = "cell-class")]
    pub cell_class: String,

    /// Interior spaces carry no meaning for this script and are stripped
    /// from the corpus text
    #[serde(rename = "space-insignificant", default)]
    pub space_insignificant: bool,
}

/// A named corpus partition with its document-list file
#[derive(Debug, Clone, Deserialize)]
pub struct PartitionEntry {
    /// Partition name, used in output file names (e.g. "n_testament")
    pub name: String,

    /// Path to the JSON file mapping document titles to URL templates
    pub documents: String,
}

/// A document URL template with `{lang1}`/`{lang2}` placeholders
#[derive(Debug, Clone)]
pub struct DocumentRef {
    /// Document title from the list file; carried for log messages only
    pub title: String,

    /// The raw URL template
    pub template: String,
}

impl DocumentRef {
    /// Substitutes the pair's URL tokens into the template and parses the
    /// result.
    pub fn resolve(&self, pair: &LanguagePair) -> Result<Url, UrlError> {
        let resolved = self
            .template
            .replace("{lang1}", &pair.first.url_token)
            .replace("{lang2}", &pair.second.url_token);

        Url::parse(&resolved).map_err(|source| UrlError::Parse {
            url: resolved,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str, token: &str) -> LanguageEntry {
        LanguageEntry {
            code: code.to_string(),
            url_token: token.to_string(),
            cell_class: "nor".to_string(),
            space_insignificant: false,
        }
    }

    #[test]
    fn test_resolve_substitutes_both_tokens() {
        let doc = DocumentRef {
            title: "Genesis 1".to_string(),
            template: "https://example.com/read?a={lang1}&b={lang2}&chap=1".to_string(),
        };
        let pair = LanguagePair {
            first: entry("zh", "tcv2019"),
            second: entry("tru", "tru"),
        };

        let url = doc.resolve(&pair).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/read?a=tcv2019&b=tru&chap=1"
        );
    }

    #[test]
    fn test_resolve_rejects_unparseable_result() {
        let doc = DocumentRef {
            title: "bad".to_string(),
            template: "not a url {lang1} {lang2}".to_string(),
        };
        let pair = LanguagePair {
            first: entry("tay", "tay"),
            second: entry("sed", "sed"),
        };

        assert!(doc.resolve(&pair).is_err());
    }
}
