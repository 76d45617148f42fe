//! End-to-end dataset pipeline orchestration.

use std::fs;
use std::path::PathBuf;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::config::PipelineConfig;
use crate::constants::corpus::{CORPUS_EXTENSION, ORIGINAL_STEM, TRANSFORMED_STEM};
use crate::corpus::{CorpusBuilder, read_corpus_lines};
use crate::errors::PipelineError;
use crate::pairs::{sample_window_pairs, shuffle_file_lines, write_pairs};
use crate::splits::{SplitLabel, split_windows};
use crate::transform::NoiseInjector;

/// Counts reported by a completed pipeline run.
#[derive(Clone, Copy, Debug)]
pub struct DatasetSummary {
    /// Lines written to the original corpus.
    pub records: usize,
    /// Lines written to the transformed corpus.
    pub transformed_records: usize,
    /// Pairs written per split, in window order (train, test, valid).
    pub split_pairs: [(SplitLabel, usize); 3],
}

/// Drives corpus construction, pairing, and split generation end to end.
///
/// Stages run sequentially: original corpus, transformed corpus, then the
/// three split files. Any stage failure propagates and halts the run; there
/// is no retry and no rollback.
pub struct DatasetPipeline {
    config: PipelineConfig,
}

impl DatasetPipeline {
    /// Create a pipeline from configuration.
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the whole pipeline and report the resulting counts.
    pub fn run(&self) -> Result<DatasetSummary, PipelineError> {
        let ratios = self.config.ratios.normalized()?;
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        fs::create_dir_all(&self.config.out_dir)?;

        let builder = CorpusBuilder::new(&self.config.data_dir);
        let original_path = self.corpus_path(ORIGINAL_STEM);
        let transformed_path = self.corpus_path(TRANSFORMED_STEM);

        let records = builder.build_corpus(&original_path, None, &mut rng)?;
        let injector = NoiseInjector::new(self.config.transform_probability);
        let transformed_records =
            builder.build_corpus(&transformed_path, Some(&injector), &mut rng)?;

        let originals = read_corpus_lines(&original_path)?;
        let transformed = read_corpus_lines(&transformed_path)?;

        let windows = split_windows(originals.len(), ratios)?;
        let mut split_pairs = [(SplitLabel::Train, 0usize); 3];
        for (slot, (label, window)) in split_pairs.iter_mut().zip(windows) {
            let pairs = sample_window_pairs(&originals, &transformed, window, &mut rng)?;
            let path = self.config.out_dir.join(label.filename());
            write_pairs(&path, &pairs)?;
            shuffle_file_lines(&path, &mut rng)?;
            info!(
                split = %label,
                pairs = pairs.len(),
                path = %path.display(),
                "split written"
            );
            *slot = (label, pairs.len());
        }

        Ok(DatasetSummary {
            records,
            transformed_records,
            split_pairs,
        })
    }

    fn corpus_path(&self, stem: &str) -> PathBuf {
        self.config
            .out_dir
            .join(format!("{stem}.{CORPUS_EXTENSION}"))
    }
}
