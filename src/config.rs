use std::path::PathBuf;

use crate::constants::transform::NAME_CORRUPTION_PROBABILITY;
use crate::splits::SplitRatios;

/// Top-level pipeline configuration.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Directory containing bundle export files.
    pub data_dir: PathBuf,
    /// Directory that receives corpus and split files.
    pub out_dir: PathBuf,
    /// Optional RNG seed. `None` seeds from OS entropy, so runs are
    /// non-reproducible; a fixed seed makes the whole run deterministic.
    pub seed: Option<u64>,
    /// Split ratios used when carving pair windows.
    pub ratios: SplitRatios,
    /// Probability that a transformed line's names are corrupted.
    pub transform_probability: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            out_dir: PathBuf::from("."),
            seed: None,
            ratios: SplitRatios::default(),
            transform_probability: NAME_CORRUPTION_PROBABILITY,
        }
    }
}

impl PipelineConfig {
    /// Create a config with explicit data and output directories.
    pub fn new(data_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            out_dir: out_dir.into(),
            ..Self::default()
        }
    }

    /// Fix the RNG seed for a deterministic run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Override split ratios.
    pub fn with_ratios(mut self, ratios: SplitRatios) -> Self {
        self.ratios = ratios;
        self
    }

    /// Override the name-corruption probability (clamped to `0.0..=1.0`).
    pub fn with_transform_probability(mut self, probability: f32) -> Self {
        self.transform_probability = probability.clamp(0.0, 1.0);
        self
    }
}
