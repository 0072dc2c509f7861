//! Language pairs and pair enumeration
//!
//! The work universe of a crawl is every unordered pair of configured
//! languages. Pairs keep the configured enumeration order, which also fixes
//! output file naming.

use crate::config::LanguageEntry;

/// An unordered pair of distinct configured languages
///
/// `first` and `second` follow the order the languages appear in the
/// configuration, so a (zh, tru) pair is never also produced as (tru, zh).
#[derive(Debug, Clone)]
pub struct LanguagePair {
    pub first: LanguageEntry,
    pub second: LanguageEntry,
}

impl LanguagePair {
    /// Enumerates all C(n,2) pairs of the configured languages, in
    /// configuration order.
    pub fn enumerate(languages: &[LanguageEntry]) -> Vec<LanguagePair> {
        let mut pairs = Vec::new();
        for (i, first) in languages.iter().enumerate() {
            for second in &languages[i + 1..] {
                pairs.push(LanguagePair {
                    first: first.clone(),
                    second: second.clone(),
                });
            }
        }
        pairs
    }

    /// File-name stem for this pair, e.g. "zh-tru"
    pub fn file_stem(&self) -> String {
        format!("{}-{}", self.first.code, self.second.code)
    }

    /// Which sides of an aligned pair must have interior spaces stripped
    pub fn space_stripping(&self) -> (bool, bool) {
        (
            self.first.space_insignificant,
            self.second.space_insignificant,
        )
    }
}

impl std::fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.first.code, self.second.code)
    }
}
