//! Pair sampling, labeling, and split-file persistence.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::constants::splits::{LABEL_MATCH, LABEL_NON_MATCH, PAIR_SEPARATOR};
use crate::errors::PipelineError;
use crate::splits::SplitWindow;
use crate::types::{FlatLine, LineIndex};

/// Ground-truth label for one training pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairLabel {
    /// The candidate line derives from the same source record.
    Match,
    /// The candidate line derives from a different source record.
    NonMatch,
}

impl PairLabel {
    /// Wire form written to split files.
    pub fn as_str(self) -> &'static str {
        match self {
            PairLabel::Match => LABEL_MATCH,
            PairLabel::NonMatch => LABEL_NON_MATCH,
        }
    }
}

/// One labeled example: an original line, a candidate line, and whether
/// they describe the same source record. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabeledPair {
    /// The untransformed corpus line.
    pub original: FlatLine,
    /// The transformed line paired against it.
    pub candidate: FlatLine,
    /// Ground-truth match indicator.
    pub label: PairLabel,
}

/// Build the labeled pairs for one split window.
///
/// Indices in the first half of the window (below the midpoint) pair with
/// the transformed line at the same index, which the corpus builder
/// guarantees derives from the same source record. Indices in the second
/// half pair with a uniformly random other transformed line. Indexing past
/// either corpus is an error, so a line-count mismatch between the two
/// corpora surfaces here instead of polluting labels.
pub fn sample_window_pairs<R: Rng + ?Sized>(
    originals: &[FlatLine],
    transformed: &[FlatLine],
    window: SplitWindow,
    rng: &mut R,
) -> Result<Vec<LabeledPair>, PipelineError> {
    let total = originals.len();
    let midpoint = window.midpoint();
    let mut pairs = Vec::with_capacity(window.len());
    for idx in window.start..window.end {
        let original = line_at(originals, idx)?.clone();
        let (candidate_idx, label) = if idx < midpoint {
            (idx, PairLabel::Match)
        } else {
            (random_index_except(idx, total, rng)?, PairLabel::NonMatch)
        };
        let candidate = line_at(transformed, candidate_idx)?.clone();
        pairs.push(LabeledPair {
            original,
            candidate,
            label,
        });
    }
    Ok(pairs)
}

fn line_at(lines: &[FlatLine], index: LineIndex) -> Result<&FlatLine, PipelineError> {
    lines.get(index).ok_or(PipelineError::LineOutOfRange {
        index,
        total: lines.len(),
    })
}

/// Uniform index in `[0, total)` other than `excluded`, by rejection
/// sampling. Needs at least two lines to terminate.
fn random_index_except<R: Rng + ?Sized>(
    excluded: LineIndex,
    total: usize,
    rng: &mut R,
) -> Result<LineIndex, PipelineError> {
    if total < 2 {
        return Err(PipelineError::Pairing(format!(
            "cannot sample a non-match candidate from a corpus of {total} lines"
        )));
    }
    loop {
        let candidate = rng.random_range(0..total);
        if candidate != excluded {
            return Ok(candidate);
        }
    }
}

/// Write pairs as `original<TAB>candidate<TAB>label` lines.
pub fn write_pairs(path: &Path, pairs: &[LabeledPair]) -> Result<(), PipelineError> {
    let mut out = BufWriter::new(fs::File::create(path)?);
    for pair in pairs {
        writeln!(
            out,
            "{}{PAIR_SEPARATOR}{}{PAIR_SEPARATOR}{}",
            pair.original,
            pair.candidate,
            pair.label.as_str()
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Shuffle a split file's lines in place: whole-file read, in-memory
/// shuffle, full rewrite. The multiset of lines is preserved.
pub fn shuffle_file_lines<R: Rng + ?Sized>(path: &Path, rng: &mut R) -> Result<(), PipelineError> {
    let content = fs::read_to_string(path)?;
    let mut lines: Vec<&str> = content.lines().collect();
    lines.shuffle(rng);
    let mut out = BufWriter::new(fs::File::create(path)?);
    for line in &lines {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}
