#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// FHIR bundle parsing into patient records.
pub mod bundle;
/// Pipeline configuration types.
pub mod config;
/// Centralized constants used across flattening, corpora, and splits.
pub mod constants;
/// Corpus construction from bundle directories.
pub mod corpus;
/// Record flattening into canonical corpus lines.
pub mod flatten;
/// Pair sampling, labeling, and split-file persistence.
pub mod pairs;
/// End-to-end dataset pipeline orchestration.
pub mod pipeline;
/// Narrow read-only patient record interface.
pub mod record;
/// Split labels, ratios, and window arithmetic.
pub mod splits;
/// Controlled-noise transformation of flattened records.
pub mod transform;
/// Shared type aliases.
pub mod types;

mod errors;

pub use bundle::{BundlePatient, parse_bundle_file, parse_bundle_str};
pub use config::PipelineConfig;
pub use corpus::{CorpusBuilder, read_corpus_lines};
pub use errors::PipelineError;
pub use flatten::flatten_patient;
pub use pairs::{LabeledPair, PairLabel, sample_window_pairs, shuffle_file_lines, write_pairs};
pub use pipeline::{DatasetPipeline, DatasetSummary};
pub use record::{AddressEntry, NameEntry, PatientFields, TelecomEntry};
pub use splits::{SplitLabel, SplitRatios, SplitWindow, split_windows};
pub use transform::{NameCorruption, NoiseInjector, rotated_identifier};
pub use types::{FlatLine, LineIndex, PatientId};
