//! Age extraction from the combined gender/age/birthdate field.
//!
//! Source text reads like "Мужчина , 42 года , родился 6 октября 1976"; the
//! age is the first digit run followed by a year word ("года"/"лет"), which
//! keeps the birth year out of the match. Rows without a match get the
//! column median, computed once after the full scan.

use anyhow::Result;
use polars::prelude::*;
use regex::Regex;

use super::{RunReport, Stage};
use crate::schema::{utf8_column, COL_AGE, COL_GENDER_AGE};

pub struct AgeStage {
    pattern: Regex,
}

impl AgeStage {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"(\d+)\s*[гл]").expect("valid regex"),
        }
    }

    pub fn parse(&self, raw: &str) -> Option<f64> {
        self.pattern
            .captures(raw)
            .and_then(|captures| captures.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
    }
}

impl Default for AgeStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for AgeStage {
    fn name(&self) -> &'static str {
        "age"
    }

    fn apply(&self, df: DataFrame, _report: &mut RunReport) -> Result<DataFrame> {
        let raw = utf8_column(&df, COL_GENDER_AGE)?;
        let raw = raw.str()?;
        let parsed: Vec<Option<f64>> = raw
            .into_iter()
            .map(|cell| cell.and_then(|text| self.parse(text)))
            .collect();

        // Median over parsed values only; 0.0 if nothing parsed at all.
        let median = Series::new(COL_AGE.into(), parsed.clone())
            .median()
            .unwrap_or(0.0);
        let filled: Vec<f64> = parsed
            .into_iter()
            .map(|age| age.unwrap_or(median))
            .collect();

        let mut df = df;
        df.with_column(Series::new(COL_AGE.into(), filled))?;
        Ok(df)
    }
}
