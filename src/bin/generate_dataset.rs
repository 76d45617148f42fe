use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use patient_pairs::{DatasetPipeline, PipelineConfig, SplitRatios};

#[derive(Debug, Parser)]
#[command(
    name = "generate_dataset",
    disable_help_subcommand = true,
    about = "Generate labeled record-matching training data from FHIR bundles",
    long_about = "Flatten patient resources into corpus lines, emit corrupted variants, and carve labeled pairs into shuffled train/test/valid splits."
)]
struct GenerateDatasetCli {
    #[arg(
        long = "data-root",
        value_name = "PATH",
        default_value = "data",
        help = "Directory containing bundle export files"
    )]
    data_root: PathBuf,
    #[arg(
        long = "out-dir",
        value_name = "PATH",
        default_value = ".",
        help = "Directory that receives corpus and split files"
    )]
    out_dir: PathBuf,
    #[arg(
        long,
        help = "Optional deterministic seed; omitted means OS entropy (non-reproducible runs)"
    )]
    seed: Option<u64>,
    #[arg(
        long = "split-ratios",
        value_name = "TRAIN,VALIDATION,TEST",
        value_parser = parse_split_ratios_arg,
        default_value = "0.8,0.1,0.1",
        help = "Comma-separated split ratios that must sum to 1.0"
    )]
    split: SplitRatios,
    #[arg(
        long = "transform-probability",
        value_name = "PROBABILITY",
        value_parser = parse_probability,
        default_value = "0.5",
        help = "Probability that a transformed line's names are corrupted"
    )]
    transform_probability: f32,
}

fn parse_split_ratios_arg(raw: &str) -> Result<SplitRatios, String> {
    let parts: Vec<&str> = raw.split(',').collect();
    if parts.len() != 3 {
        return Err("--split-ratios expects exactly 3 comma-separated values".to_string());
    }
    let train = parts[0]
        .trim()
        .parse::<f32>()
        .map_err(|_| format!("invalid train ratio '{}': must be a float", parts[0].trim()))?;
    let validation = parts[1].trim().parse::<f32>().map_err(|_| {
        format!(
            "invalid validation ratio '{}': must be a float",
            parts[1].trim()
        )
    })?;
    let test = parts[2]
        .trim()
        .parse::<f32>()
        .map_err(|_| format!("invalid test ratio '{}': must be a float", parts[2].trim()))?;
    let ratios = SplitRatios {
        train,
        validation,
        test,
    };
    let sum = ratios.train + ratios.validation + ratios.test;
    if (sum - 1.0).abs() > 1e-5 {
        return Err(format!(
            "split ratios must sum to 1.0, got {:.6} (train={}, validation={}, test={})",
            sum, ratios.train, ratios.validation, ratios.test
        ));
    }
    Ok(ratios)
}

fn parse_probability(raw: &str) -> Result<f32, String> {
    let probability = raw
        .trim()
        .parse::<f32>()
        .map_err(|_| format!("invalid probability '{}': must be a float", raw.trim()))?;
    if !(0.0..=1.0).contains(&probability) {
        return Err(format!(
            "probability {probability} is outside the range 0.0..=1.0"
        ));
    }
    Ok(probability)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = GenerateDatasetCli::parse();
    let mut config = PipelineConfig::new(cli.data_root, cli.out_dir)
        .with_ratios(cli.split)
        .with_transform_probability(cli.transform_probability);
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    match DatasetPipeline::new(config).run() {
        Ok(summary) => {
            println!("records: {}", summary.records);
            println!("transformed records: {}", summary.transformed_records);
            for (label, pairs) in summary.split_pairs {
                println!("  [{label}] pairs: {pairs}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("dataset generation failed: {err}");
            ExitCode::FAILURE
        }
    }
}
