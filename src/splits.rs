use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::splits::{ALL_SPLITS, TEST_FILENAME, TRAIN_FILENAME, VALID_FILENAME};
use crate::errors::PipelineError;
use crate::types::LineIndex;

/// Logical dataset partitions produced by the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitLabel {
    /// Training split.
    Train,
    /// Test split.
    Test,
    /// Validation split.
    Validation,
}

impl SplitLabel {
    /// Output filename for this split's pair file.
    pub fn filename(self) -> &'static str {
        match self {
            SplitLabel::Train => TRAIN_FILENAME,
            SplitLabel::Test => TEST_FILENAME,
            SplitLabel::Validation => VALID_FILENAME,
        }
    }
}

impl fmt::Display for SplitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitLabel::Train => write!(f, "train"),
            SplitLabel::Test => write!(f, "test"),
            SplitLabel::Validation => write!(f, "valid"),
        }
    }
}

/// Ratio configuration for train/validation/test window sizing.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SplitRatios {
    /// Fraction assigned to train.
    pub train: f32,
    /// Fraction assigned to validation.
    pub validation: f32,
    /// Fraction assigned to test.
    pub test: f32,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.8,
            validation: 0.1,
            test: 0.1,
        }
    }
}

impl SplitRatios {
    /// Validate that ratios sum to `1.0` (within epsilon).
    pub fn normalized(self) -> Result<Self, PipelineError> {
        let sum = self.train + self.validation + self.test;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(PipelineError::Configuration(
                "split ratios must sum to 1.0".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Half-open window `[start, end)` of corpus line indices assigned to one
/// split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitWindow {
    /// First line index inside the window.
    pub start: LineIndex,
    /// First line index past the window.
    pub end: LineIndex,
}

impl SplitWindow {
    /// Create a window over `[start, end)`.
    pub fn new(start: LineIndex, end: LineIndex) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Number of line indices inside the window.
    pub fn len(self) -> usize {
        self.end - self.start
    }

    /// True when the window covers no lines.
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Midpoint separating match pairs (below) from non-match pairs (at or
    /// above). A one-line window therefore yields a non-match pair.
    pub fn midpoint(self) -> LineIndex {
        self.start + self.len() / 2
    }
}

/// Compute the three split windows partitioning `[0, total)`.
///
/// Cut points are `round(total * train)` and `round(total * (train + test))`,
/// clamped monotone; the validation window absorbs the remainder. The windows
/// are strictly disjoint and exactly cover the corpus, in the canonical
/// train, test, valid order.
pub fn split_windows(
    total: usize,
    ratios: SplitRatios,
) -> Result<[(SplitLabel, SplitWindow); 3], PipelineError> {
    let ratios = ratios.normalized()?;
    let c1 = cut_point(total, f64::from(ratios.train)).min(total);
    let c2 = cut_point(total, f64::from(ratios.train + ratios.test)).clamp(c1, total);
    let bounds = [(0, c1), (c1, c2), (c2, total)];
    let mut windows = [(SplitLabel::Train, SplitWindow::new(0, 0)); 3];
    for (slot, (label, (start, end))) in windows.iter_mut().zip(ALL_SPLITS.into_iter().zip(bounds))
    {
        *slot = (label, SplitWindow::new(start, end));
    }
    Ok(windows)
}

fn cut_point(total: usize, fraction: f64) -> usize {
    ((total as f64) * fraction).round() as usize
}
