//! mincer: hh.ru résumé preprocessing and salary modelling.
//!
//! ```bash
//! mincer preprocess --file hh.csv   # extraction chain -> x_data.npy / y_data.npy
//! mincer train                      # OLS fit -> resources/weights.npy + bias.npy
//! mincer predict                    # salaries, one per line, on stdout
//! mincer classify                   # developer-level classifier from job titles
//! ```
//!
//! Logging goes to stderr (`RUST_LOG` overrides the default `info` level);
//! stdout is reserved for `predict` results. Any failure exits non-zero.

use anyhow::Result;
use clap::Parser as _;

use mincer::cli::{run_command, Cli};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    run_command(cli.command)
}
