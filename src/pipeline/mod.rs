//! The extraction chain: raw résumé table in, annotated table out.
//!
//! Each stage is an independent `DataFrame -> DataFrame` transform applied in
//! a fixed order by [`Pipeline::run`]. Stages share no state; anything a
//! stage wants to surface to the caller (dropped-row counts, the fitted city
//! vocabulary) goes through [`RunReport`] instead.
//!
//! Stage order matters in exactly one place: the unparsable-salary filter is
//! the only stage that may change the row count, and it runs right after the
//! salary parse so every later stage sees the final row population.

pub mod age;
pub mod city;
pub mod experience;
pub mod salary;
pub mod vocab;

use anyhow::{Context as _, Result};
use polars::prelude::DataFrame;

use crate::config::PipelineConfig;
use self::vocab::CityVocabulary;

/// One step of the extraction chain.
pub trait Stage {
    fn name(&self) -> &'static str;

    /// Transform the table. Data-quality problems are absorbed with the
    /// stage's documented default, never returned as errors.
    fn apply(&self, df: DataFrame, report: &mut RunReport) -> Result<DataFrame>;
}

/// What a run did, beyond the table itself.
#[derive(Debug, Default)]
pub struct RunReport {
    pub rows_in: usize,
    pub rows_dropped: usize,
    /// The city vocabulary used for encoding: freshly fitted, or the
    /// persisted one the city stage was constructed with.
    pub vocabulary: Option<CityVocabulary>,
}

pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// The standard chain: salary parse, salary filter, age, experience,
    /// city one-hot. A `vocabulary` switches the city stage from fit mode
    /// to a persisted column layout.
    pub fn standard(config: &PipelineConfig, vocabulary: Option<CityVocabulary>) -> Self {
        Self::new(vec![
            Box::new(salary::SalaryStage::new(config.currencies.clone())),
            Box::new(salary::DropUnparsedSalary),
            Box::new(age::AgeStage::new()),
            Box::new(experience::ExperienceStage::new()),
            Box::new(city::CityStage::new(config, vocabulary)),
        ])
    }

    pub fn run(&self, df: DataFrame) -> Result<(DataFrame, RunReport)> {
        let mut report = RunReport {
            rows_in: df.height(),
            ..RunReport::default()
        };

        let mut df = df;
        for stage in &self.stages {
            let before = df.height();
            df = stage
                .apply(df, &mut report)
                .with_context(|| format!("stage '{}' failed", stage.name()))?;
            let after = df.height();
            if after != before {
                log::info!(
                    "stage '{}': {before} -> {after} rows",
                    stage.name()
                );
            }
            debug_assert!(after <= before, "stages must never add rows");
        }

        Ok((df, report))
    }
}
