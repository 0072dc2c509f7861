//! Merge-aligner for parallel verse streams
//!
//! The source site renders the two languages of a page as parallel verse
//! cells, one row per verse number. A verse that is typographically merged
//! into the previous verse is rendered as a continuation-marker cell, and
//! the merge can happen on one side only: verse N may stand alone in one
//! language while the other language folds it into verse N-1. This module
//! reconstructs the true verse boundaries from the two streams.

/// One finalized bilingual verse-group record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedPair {
    pub text1: String,
    pub text2: String,
}

/// Aligns two parallel verse-fragment sequences into sentence pairs
///
/// Both sequences are consumed in lockstep by index; callers must have
/// verified they are the same length (the extractor fails a document with
/// mismatched cell counts before alignment is attempted).
///
/// Per index, a marker on one side means that side's verse was merged into
/// the previous verse, so only the other side keeps accumulating; a marker
/// on both sides contributes nothing. A marker-free index is a new verse
/// boundary: the accumulators are emitted first (when either is non-empty)
/// and restarted from the current fragments. The accumulators are always
/// emitted once more after the loop, so trivial inputs (empty, or markers
/// throughout) yield a single empty record rather than none.
///
/// `strip1`/`strip2` remove interior spaces from the corresponding side of
/// every emitted pair, for scripts where spaces carry no meaning. Stripping
/// runs as a post-pass over the emitted sequence so it cannot disturb the
/// marker comparison during the main pass.
///
/// # Arguments
///
/// * `frags1` - Verse fragments of the first language, in document order
/// * `frags2` - Verse fragments of the second language, in document order
/// * `marker` - The continuation-marker sentinel text
/// * `strip1` - Strip interior spaces from the first side
/// * `strip2` - Strip interior spaces from the second side
pub fn align(
    frags1: &[String],
    frags2: &[String],
    marker: &str,
    strip1: bool,
    strip2: bool,
) -> Vec<AlignedPair> {
    debug_assert_eq!(frags1.len(), frags2.len());

    let mut pairs = Vec::new();
    let mut acc1 = String::new();
    let mut acc2 = String::new();

    for (f1, f2) in frags1.iter().zip(frags2.iter()) {
        match (f1 == marker, f2 == marker) {
            // Merged into the previous verse on both sides: nothing new
            (true, true) => continue,
            (true, false) => acc2.push_str(f2),
            (false, true) => acc1.push_str(f1),
            (false, false) => {
                if !acc1.is_empty() || !acc2.is_empty() {
                    pairs.push(AlignedPair {
                        text1: std::mem::take(&mut acc1),
                        text2: std::mem::take(&mut acc2),
                    });
                }
                acc1 = f1.clone();
                acc2 = f2.clone();
            }
        }
    }

    // Final flush is unconditional; a document of nothing but markers still
    // emits one (empty, empty) record.
    pairs.push(AlignedPair {
        text1: acc1,
        text2: acc2,
    });

    if strip1 || strip2 {
        for pair in &mut pairs {
            if strip1 {
                pair.text1.retain(|c| c != ' ');
            }
            if strip2 {
                pair.text2.retain(|c| c != ' ');
            }
        }
    }

    pairs
}
