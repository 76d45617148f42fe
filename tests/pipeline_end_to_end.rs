use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::json;

use patient_pairs::{DatasetPipeline, PipelineConfig, SplitLabel};

/// Ten distinct family names, none a substring of another.
const FAMILIES: [&str; 10] = [
    "Abbott", "Baxter", "Connor", "Dalton", "Ellison", "Foster", "Griffin", "Hawkins", "Ibarra",
    "Jensen",
];

fn patient_resource(idx: usize, family: &str) -> serde_json::Value {
    json!({ "resource": {
        "resourceType": "Patient",
        "id": format!("source-id-{idx:02}"),
        "name": [{
            "prefix": ["Mr."],
            "given": [format!("Given{idx}")],
            "family": family
        }],
        "telecom": [{ "system": "phone", "value": format!("555-01{idx:02}"), "use": "home" }],
        "gender": "male",
        "birthDate": "1980-01-15",
        "address": [{
            "line": ["1 Main St"],
            "city": "Springfield",
            "state": "MA",
            "postalCode": "01101",
            "country": "US"
        }],
        "maritalStatus": { "text": "Single" }
    } })
}

/// Write the ten fixture patients across three bundle files. File names sort
/// in the order the records are listed, so corpus line `i` carries
/// `FAMILIES[i]`.
fn write_fixture_bundles(dir: &Path) {
    let groups: [(&str, &[usize]); 3] = [
        ("a_bundle.json", &[0, 1, 2, 3]),
        ("b_bundle.json", &[4, 5, 6]),
        ("c_bundle.json", &[7, 8, 9]),
    ];
    for (name, indices) in groups {
        let entries: Vec<serde_json::Value> = indices
            .iter()
            .map(|&idx| patient_resource(idx, FAMILIES[idx]))
            .collect();
        let bundle = json!({ "resourceType": "Bundle", "type": "collection", "entry": entries });
        fs::write(dir.join(name), bundle.to_string()).unwrap();
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn id_token(line: &str) -> String {
    // Lines start `COL id VAL <id> ...`.
    line.split_whitespace().nth(3).unwrap().to_string()
}

fn family_of(line: &str) -> &'static str {
    let mut found = FAMILIES.iter().filter(|family| line.contains(**family));
    let family = found.next().expect("line should carry a fixture family");
    assert!(found.next().is_none(), "families must be unambiguous");
    *family
}

#[test]
fn full_pipeline_produces_aligned_corpora_and_labeled_splits() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_fixture_bundles(data.path());

    let config = PipelineConfig::new(data.path(), out.path()).with_seed(4242);
    let summary = DatasetPipeline::new(config).run().unwrap();

    assert_eq!(summary.records, 10);
    assert_eq!(summary.transformed_records, 10);
    assert_eq!(summary.split_pairs[0], (SplitLabel::Train, 8));
    assert_eq!(summary.split_pairs[1], (SplitLabel::Test, 1));
    assert_eq!(summary.split_pairs[2], (SplitLabel::Validation, 1));

    let originals = read_lines(&out.path().join("patient_train.txt"));
    let transformed = read_lines(&out.path().join("patient_transformed.txt"));
    assert_eq!(originals.len(), 10);
    assert_eq!(transformed.len(), 10);

    for (idx, (original, variant)) in originals.iter().zip(&transformed).enumerate() {
        // Line i of each corpus describes source record i.
        assert!(original.contains(FAMILIES[idx]));
        assert!(variant.contains(FAMILIES[idx]));
        // Identifier rotation: a fresh UUID, never the source id.
        assert_eq!(id_token(original), format!("source-id-{idx:02}"));
        let rotated = id_token(variant);
        assert_ne!(rotated, id_token(original));
        assert!(uuid::Uuid::parse_str(&rotated).is_ok());
        // Fields outside names and id are never corrupted.
        assert!(variant.contains("COL gender VAL male "));
        assert!(variant.contains("COL birthDate VAL 1980-01-15 "));
        assert!(variant.contains("COL maritalStatus VAL Single "));
    }

    let id_to_family: HashMap<String, &str> = (0..10)
        .map(|idx| (format!("source-id-{idx:02}"), FAMILIES[idx]))
        .collect();

    for (label, expected_pairs) in [
        (SplitLabel::Train, 8),
        (SplitLabel::Test, 1),
        (SplitLabel::Validation, 1),
    ] {
        let lines = read_lines(&out.path().join(label.filename()));
        assert_eq!(lines.len(), expected_pairs);
        for line in &lines {
            let columns: Vec<&str> = line.split('\t').collect();
            assert_eq!(columns.len(), 3, "split rows are original\\tcandidate\\tlabel");
            let (original, candidate, pair_label) = (columns[0], columns[1], columns[2]);
            let family = id_to_family[&id_token(original)];
            match pair_label {
                "1" => assert_eq!(family_of(candidate), family),
                "0" => assert_ne!(family_of(candidate), family),
                other => panic!("unexpected label '{other}'"),
            }
        }
    }

    // Train window [0, 8) has midpoint 4: exactly four matches and four
    // non-matches; the one-line test and valid windows are non-matches.
    let train = read_lines(&out.path().join("train.txt"));
    let matches = train.iter().filter(|line| line.ends_with("\t1")).count();
    let non_matches = train.iter().filter(|line| line.ends_with("\t0")).count();
    assert_eq!(matches, 4);
    assert_eq!(non_matches, 4);
    for split in ["test.txt", "valid.txt"] {
        let lines = read_lines(&out.path().join(split));
        assert!(lines[0].ends_with("\t0"));
    }
}

#[test]
fn seeded_reruns_are_byte_identical() {
    let data = tempfile::tempdir().unwrap();
    write_fixture_bundles(data.path());

    let outputs = [
        "patient_train.txt",
        "patient_transformed.txt",
        "train.txt",
        "test.txt",
        "valid.txt",
    ];
    let first_out = tempfile::tempdir().unwrap();
    let second_out = tempfile::tempdir().unwrap();
    for out in [&first_out, &second_out] {
        let config = PipelineConfig::new(data.path(), out.path()).with_seed(7);
        DatasetPipeline::new(config).run().unwrap();
    }
    for name in outputs {
        assert_eq!(
            fs::read_to_string(first_out.path().join(name)).unwrap(),
            fs::read_to_string(second_out.path().join(name)).unwrap(),
            "seeded runs must agree on {name}"
        );
    }
}

#[test]
fn malformed_bundle_aborts_the_run() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_fixture_bundles(data.path());
    fs::write(data.path().join("broken.json"), "{ not a bundle").unwrap();

    let config = PipelineConfig::new(data.path(), out.path()).with_seed(1);
    let err = DatasetPipeline::new(config).run().unwrap_err();
    assert!(matches!(
        err,
        patient_pairs::PipelineError::MalformedBundle { .. }
    ));
}

#[test]
fn empty_data_directory_yields_empty_outputs() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    let config = PipelineConfig::new(data.path(), out.path()).with_seed(1);
    let summary = DatasetPipeline::new(config).run().unwrap();
    assert_eq!(summary.records, 0);
    for (_, pairs) in summary.split_pairs {
        assert_eq!(pairs, 0);
    }
    for name in ["train.txt", "test.txt", "valid.txt"] {
        assert_eq!(fs::read_to_string(out.path().join(name)).unwrap(), "");
    }
}
