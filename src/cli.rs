//! Command-line surface.
//!
//! Every command takes explicit paths but falls back to a fixed candidate
//! list when none is given, mirroring how the dumps are usually laid out
//! next to the working directory. stdout is reserved for `predict` output;
//! diagnostics go to stderr through the logger.

use anyhow::{anyhow, bail, Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::assemble::assemble;
use crate::config::PipelineConfig;
use crate::model::level;
use crate::model::linear::{self, SalaryModel};
use crate::pipeline::vocab::CityVocabulary;
use crate::pipeline::Pipeline;
use crate::{io, schema};

/// Salaries below this are hh.ru placeholder listings, above it data-entry
/// anomalies; both are excluded from training.
const SALARY_FLOOR: f64 = 15_000.0;
const SALARY_CEIL: f64 = 1_000_000.0;

const INPUT_CANDIDATES: [&str; 4] = ["hh.csv", "data/hh.csv", "../hh.csv", "../../hh.csv"];
const ARRAY_DIRS: [&str; 3] = [".", "data", ".."];

const MATRIX_FILE: &str = "x_data.npy";
const TARGET_FILE: &str = "y_data.npy";
const VOCAB_FILE: &str = "city_vocab.json";

#[derive(Parser)]
#[command(name = "mincer", about = "hh.ru résumé preprocessing and salary modelling")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the extraction chain over a résumé dump and write the array pair
    Preprocess {
        /// Path to the CSV dump. Defaults to hh.csv found near the working directory.
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Reuse a persisted city vocabulary instead of fitting one
        #[arg(long)]
        vocab: Option<PathBuf>,

        /// Path to a JSON pipeline configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Fit the salary regression on a preprocessed array pair
    Train {
        /// Feature matrix path. Defaults to x_data.npy found near the working directory.
        #[arg(long)]
        x: Option<PathBuf>,

        /// Target vector path. Defaults to y_data.npy next to the matrix.
        #[arg(long)]
        y: Option<PathBuf>,

        /// Directory for the weight artifacts
        #[arg(long, default_value = "resources")]
        resources: PathBuf,
    },
    /// Predict salaries; prints one value per row to stdout
    Predict {
        /// Feature matrix path. Defaults to x_data.npy found near the working directory.
        #[arg(long)]
        x: Option<PathBuf>,

        /// Directory holding the weight artifacts
        #[arg(long, default_value = "resources")]
        resources: PathBuf,
    },
    /// Train the developer-level classifier from job titles
    Classify {
        /// Path to the CSV dump. Defaults to hh.csv found near the working directory.
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Path to a JSON pipeline configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory for the model artifact
        #[arg(long, default_value = "resources")]
        resources: PathBuf,
    },
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Preprocess {
            file,
            vocab,
            config,
        } => handle_preprocess(file, vocab, config),
        Commands::Train { x, y, resources } => handle_train(x, y, &resources),
        Commands::Predict { x, resources } => handle_predict(x, &resources),
        Commands::Classify {
            file,
            config,
            resources,
        } => handle_classify(file, config, &resources),
    }
}

fn handle_preprocess(
    file: Option<PathBuf>,
    vocab: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let file = resolve_input_file(file)?;
    let config = load_config(config_path)?;

    let df = io::load_table(&file)?;
    schema::validate_input(&df)?;

    let vocabulary = vocab.as_deref().map(CityVocabulary::load).transpose()?;
    let fit_fresh = vocabulary.is_none();

    let pipeline = Pipeline::standard(&config, vocabulary);
    let (df, report) = pipeline.run(df).context("extraction chain failed")?;
    log::info!(
        "{} rows in, {} dropped for unparsable salary, {} kept",
        report.rows_in,
        report.rows_dropped,
        df.height()
    );

    let arrays = assemble(&df)?;

    let out_dir = file.parent().unwrap_or_else(|| Path::new("."));
    io::write_matrix(&out_dir.join(MATRIX_FILE), &arrays.x)?;
    io::write_vector(&out_dir.join(TARGET_FILE), &arrays.y)?;
    if fit_fresh {
        if let Some(vocabulary) = &report.vocabulary {
            vocabulary.save(&out_dir.join(VOCAB_FILE))?;
        }
    }

    log::info!(
        "saved {MATRIX_FILE} ({} x {}) and {TARGET_FILE} ({}) to {}",
        arrays.x.nrows(),
        arrays.x.ncols(),
        arrays.y.len(),
        out_dir.display()
    );
    Ok(())
}

fn handle_train(x: Option<PathBuf>, y: Option<PathBuf>, resources: &Path) -> Result<()> {
    let (x_path, y_path) = resolve_array_pair(x, y)?;
    let x = io::read_matrix(&x_path)?;
    let y = io::read_vector(&y_path)?;
    if x.nrows() != y.len() {
        bail!(
            "feature matrix has {} rows but the target vector has {}",
            x.nrows(),
            y.len()
        );
    }

    let total = y.len();
    let (x, y) = linear::filter_target_range(&x, &y, SALARY_FLOOR, SALARY_CEIL);
    log::info!("outlier filter kept {}/{total} rows", y.len());

    let (model, report) = SalaryModel::fit(x, y)?;
    model.save(resources)?;

    log::info!(
        "trained: MSE {:.0}, RMSE {:.0}, R² {:.4}",
        report.mse,
        report.rmse,
        report.r2
    );
    log::info!("weights saved to {}", resources.display());
    Ok(())
}

#[expect(clippy::print_stdout)] // stdout carries the numeric results by contract
fn handle_predict(x: Option<PathBuf>, resources: &Path) -> Result<()> {
    let x_path = resolve_matrix(x)?;
    let x = io::read_matrix(&x_path)?;
    let model = SalaryModel::load(resources)?;

    if model.weights.len() != x.ncols() {
        bail!(
            "weight vector has {} features but the matrix has {} columns; \
             the vocabulary layouts differ; re-run `mincer preprocess --vocab` \
             with the training vocabulary",
            model.weights.len(),
            x.ncols()
        );
    }

    for value in model.predict(&x) {
        println!("{value:.2}");
    }
    Ok(())
}

fn handle_classify(
    file: Option<PathBuf>,
    config_path: Option<PathBuf>,
    resources: &Path,
) -> Result<()> {
    let file = resolve_input_file(file)?;
    let config = load_config(config_path)?;

    let df = io::load_table(&file)?;
    let data = level::build_dataset(&df, &config)?;
    log::info!(
        "labelled dataset: {} rows, {} features",
        data.y.len(),
        data.feature_names.len()
    );

    let report = level::train(data, resources)?;
    for (name, count) in level::LEVELS.iter().zip(report.class_counts) {
        log::info!("  {name}: {count}");
    }
    log::info!(
        "accuracy {:.1}% on {} held-out rows ({} trained)",
        report.accuracy * 100.0,
        report.test_rows,
        report.train_rows
    );
    log::info!("model saved to {}", resources.join(level::MODEL_FILE).display());
    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            log::info!("loading pipeline config from {}", path.display());
            Ok(PipelineConfig::load(&path)?)
        }
        None => Ok(PipelineConfig::default()),
    }
}

fn resolve_input_file(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    for candidate in INPUT_CANDIDATES {
        let path = PathBuf::from(candidate);
        if path.exists() {
            log::info!("found input dump at {}", path.display());
            return Ok(path);
        }
    }
    Err(anyhow!(
        "no input dump found; pass one explicitly: mincer preprocess --file path/to/hh.csv"
    ))
}

fn resolve_matrix(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    for dir in ARRAY_DIRS {
        let path = Path::new(dir).join(MATRIX_FILE);
        if path.exists() {
            log::info!("found feature matrix at {}", path.display());
            return Ok(path);
        }
    }
    Err(anyhow!(
        "{MATRIX_FILE} not found; run `mincer preprocess` first or pass --x"
    ))
}

fn resolve_array_pair(
    x: Option<PathBuf>,
    y: Option<PathBuf>,
) -> Result<(PathBuf, PathBuf)> {
    match (x, y) {
        (Some(x), Some(y)) => Ok((x, y)),
        (Some(x), None) => {
            let y = x.with_file_name(TARGET_FILE);
            Ok((x, y))
        }
        (None, Some(_)) => Err(anyhow!("--y requires --x")),
        (None, None) => {
            for dir in ARRAY_DIRS {
                let x = Path::new(dir).join(MATRIX_FILE);
                let y = Path::new(dir).join(TARGET_FILE);
                if x.exists() && y.exists() {
                    log::info!("found array pair in {dir}/");
                    return Ok((x, y));
                }
            }
            Err(anyhow!(
                "{MATRIX_FILE} and {TARGET_FILE} not found; run `mincer preprocess` first"
            ))
        }
    }
}
