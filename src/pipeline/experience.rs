//! Experience extraction from the free-text employment history.
//!
//! The field opens with a fixed phrase: "Опыт работы 3 года 6 месяцев" or
//! "Опыт работы 5 лет". Months become a year fraction; anything that matches
//! neither form (including a missing field) is 0.0; a genuine zero and an
//! absent history are deliberately indistinguishable.

use anyhow::Result;
use polars::prelude::*;
use regex::Regex;

use super::{RunReport, Stage};
use crate::schema::{utf8_column, COL_EXPERIENCE, COL_EXPERIENCE_YEARS};

pub struct ExperienceStage {
    years_and_months: Regex,
    years_only: Regex,
}

impl ExperienceStage {
    pub fn new() -> Self {
        Self {
            years_and_months: Regex::new(
                r"Опыт работы\s+(\d+)\s+(?:лет|год(?:а)?)\s+(\d+)\s+месяц",
            )
            .expect("valid regex"),
            years_only: Regex::new(r"Опыт работы\s+(\d+)\s+(?:лет|год(?:а)?)")
                .expect("valid regex"),
        }
    }

    pub fn parse(&self, raw: &str) -> f64 {
        let text = raw.replace('\u{a0}', " ");
        if let Some(captures) = self.years_and_months.captures(&text) {
            let years: f64 = captures[1].parse().unwrap_or(0.0);
            let months: f64 = captures[2].parse().unwrap_or(0.0);
            return years + months / 12.0;
        }
        if let Some(captures) = self.years_only.captures(&text) {
            return captures[1].parse().unwrap_or(0.0);
        }
        0.0
    }
}

impl Default for ExperienceStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for ExperienceStage {
    fn name(&self) -> &'static str {
        "experience"
    }

    fn apply(&self, df: DataFrame, _report: &mut RunReport) -> Result<DataFrame> {
        let raw = utf8_column(&df, COL_EXPERIENCE)?;
        let raw = raw.str()?;
        let parsed: Vec<f64> = raw
            .into_iter()
            .map(|cell| cell.map_or(0.0, |text| self.parse(text)))
            .collect();

        let mut df = df;
        df.with_column(Series::new(COL_EXPERIENCE_YEARS.into(), parsed))?;
        Ok(df)
    }
}
