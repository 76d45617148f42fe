//! Corpus construction from directories of bundle exports.

use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::bundle::parse_bundle_file;
use crate::errors::PipelineError;
use crate::flatten::flatten_patient;
use crate::transform::NoiseInjector;
use crate::types::FlatLine;

/// Builds corpus files from a directory of bundle exports.
///
/// One builder drives both corpus passes; enumeration order is sorted by
/// file name so that line `i` of the original corpus and line `i` of the
/// transformed corpus always derive from the same source record.
pub struct CorpusBuilder {
    data_dir: PathBuf,
}

impl CorpusBuilder {
    /// Create a builder over the given source directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Enumerate regular files directly under the data directory, sorted by
    /// file name. Subdirectories are not recursed; non-files are skipped.
    pub fn source_files(&self) -> Result<Vec<PathBuf>, PipelineError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.data_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(io::Error::from)?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Append one flattened line per patient found in the source directory
    /// to `out_path`, returning the number of lines written.
    ///
    /// With an injector, every line is the transformed variant. The output
    /// file is opened in append mode once per source file, so repeated runs
    /// accumulate; callers must delete stale output before regenerating. A
    /// source file that does not parse as a bundle aborts the whole pass.
    pub fn build_corpus<R: Rng + ?Sized>(
        &self,
        out_path: &Path,
        injector: Option<&NoiseInjector>,
        rng: &mut R,
    ) -> Result<usize, PipelineError> {
        if out_path.exists() {
            warn!(
                path = %out_path.display(),
                "output corpus already exists; append mode will accumulate lines"
            );
        }
        let files = self.source_files()?;
        // The corpus must exist even when the source directory holds no
        // files, so the read-back pass sees an empty corpus, not a missing
        // one.
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(out_path)?;
        let total_files = files.len();
        let mut lines_written = 0;
        for (idx, file) in files.iter().enumerate() {
            debug!(
                file = %file.display(),
                index = idx + 1,
                total_files,
                "processing bundle file"
            );
            let patients = parse_bundle_file(file)?;
            let mut out = OpenOptions::new()
                .create(true)
                .append(true)
                .open(out_path)?;
            for patient in &patients {
                let line = match injector {
                    Some(injector) => injector.transform_patient(patient, rng),
                    None => flatten_patient(patient),
                };
                writeln!(out, "{line}")?;
                lines_written += 1;
            }
        }
        info!(
            path = %out_path.display(),
            lines = lines_written,
            transformed = injector.is_some(),
            "corpus pass complete"
        );
        Ok(lines_written)
    }
}

/// Read a corpus file in one buffered pass. The vector length is the line
/// count, so callers never re-open the file to count lines.
pub fn read_corpus_lines(path: &Path) -> Result<Vec<FlatLine>, PipelineError> {
    let file = fs::File::open(path)?;
    let mut lines = Vec::new();
    for line in BufReader::new(file).lines() {
        lines.push(line?);
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    fn write_bundle(dir: &Path, name: &str, families: &[&str]) {
        let entries: Vec<serde_json::Value> = families
            .iter()
            .enumerate()
            .map(|(idx, family)| {
                json!({ "resource": {
                    "resourceType": "Patient",
                    "id": format!("{family}-{idx}"),
                    "name": [{ "given": ["Pat"], "family": family }]
                } })
            })
            .collect();
        let bundle = json!({ "resourceType": "Bundle", "entry": entries });
        fs::write(dir.join(name), bundle.to_string()).unwrap();
    }

    #[test]
    fn source_files_are_sorted_and_shallow() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write_bundle(root, "b.json", &["Beta"]);
        write_bundle(root, "a.json", &["Alpha"]);
        fs::create_dir(root.join("nested")).unwrap();
        write_bundle(&root.join("nested"), "c.json", &["Gamma"]);

        let files = CorpusBuilder::new(root).source_files().unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn corpus_lines_follow_file_then_record_order() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write_bundle(root, "b.json", &["Third"]);
        write_bundle(root, "a.json", &["First", "Second"]);

        let out_dir = tempfile::tempdir().unwrap();
        let out = out_dir.path().join("corpus.txt");
        let mut rng = StdRng::seed_from_u64(1);
        let written = CorpusBuilder::new(root)
            .build_corpus(&out, None, &mut rng)
            .unwrap();
        assert_eq!(written, 3);

        let lines = read_corpus_lines(&out).unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("First"));
        assert!(lines[1].contains("Second"));
        assert!(lines[2].contains("Third"));
    }

    #[test]
    fn repeated_builds_accumulate_lines() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write_bundle(root, "a.json", &["Solo"]);

        let out_dir = tempfile::tempdir().unwrap();
        let out = out_dir.path().join("corpus.txt");
        let builder = CorpusBuilder::new(root);
        let mut rng = StdRng::seed_from_u64(2);
        builder.build_corpus(&out, None, &mut rng).unwrap();
        builder.build_corpus(&out, None, &mut rng).unwrap();
        assert_eq!(read_corpus_lines(&out).unwrap().len(), 2);
    }

    #[test]
    fn unparsable_source_file_aborts_the_pass() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("bad.json"), "not a bundle").unwrap();

        let out = root.join("corpus.txt");
        let mut rng = StdRng::seed_from_u64(3);
        let err = CorpusBuilder::new(root)
            .build_corpus(&out, None, &mut rng)
            .unwrap_err();
        assert!(matches!(err, PipelineError::MalformedBundle { .. }));
    }

    #[test]
    fn missing_data_directory_is_fatal() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("absent");
        let err = CorpusBuilder::new(&missing).source_files().unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)));
    }
}
