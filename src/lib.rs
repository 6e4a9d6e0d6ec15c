//! # Mincer: résumé dumps in, model-ready arrays out
//!
//! Mincer ingests raw hh.ru résumé exports (CSV rows whose salary, age,
//! experience and city fields are free human-entered text) and grinds them
//! through a chain of independent extraction stages into clean numeric
//! feature/target arrays for simple regression and classification models.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mincer::assemble::assemble;
//! use mincer::config::PipelineConfig;
//! use mincer::pipeline::Pipeline;
//!
//! # fn example() -> anyhow::Result<()> {
//! let df = mincer::io::load_table(std::path::Path::new("hh.csv"))?;
//! mincer::schema::validate_input(&df)?;
//!
//! let pipeline = Pipeline::standard(&PipelineConfig::default(), None);
//! let (df, report) = pipeline.run(df)?;
//! println!("{} rows dropped for unparsable salary", report.rows_dropped);
//!
//! let arrays = assemble(&df)?;
//! println!("feature matrix: {} x {}", arrays.x.nrows(), arrays.x.ncols());
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`pipeline`]: the extraction chain: one stage per noisy field, plus
//!   the explicit unparsable-salary filter and the city vocabulary
//! - [`assemble`]: turns the annotated table into the `(x, y)` array pair
//! - [`model`]: salary regression and developer-level classification flows
//! - [`schema`]: the fixed input headers, validated at load time
//! - [`config`]: currency rates, city aliases and ranking policy
//! - [`io`]: CSV ingestion and `.npy` artifact persistence
//! - [`error`]: the error taxonomy (data-quality defaults vs. hard faults)
//!
//! ## Design Notes
//!
//! The chain runs single-threaded over the whole table, one full pass per
//! stage. Only the salary filter may change the row count; every other
//! stage adds or transforms columns. Data-quality problems never raise;
//! each extractor has a documented default. Missing files, missing
//! artifacts and out-of-order calls abort the run.

pub mod assemble;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod schema;
