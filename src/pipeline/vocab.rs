//! City category vocabulary.
//!
//! The ten most frequent cleaned city values keep their own category;
//! everything else collapses into "Other". Dummy encoding drops the first
//! category in sorted order as the redundant reference column.
//!
//! The vocabulary is an explicit artifact: fitted once, saved as JSON, and
//! reloadable so an inference dataset gets the training column layout
//! instead of a silently different top-ten recomputed from its own rows.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::error::{MincerError, Result};
use crate::schema::{CITY_PREFIX, COL_CITY_CLEAN};

pub const OTHER_CATEGORY: &str = "Other";
pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityVocabulary {
    /// Values that keep their own category; anything else remaps to "Other".
    retained: Vec<String>,
    /// Sorted distinct categories observed at fit time. The first entry is
    /// the dummy-encoding reference and gets no indicator column.
    categories: Vec<String>,
}

impl CityVocabulary {
    /// Rank values by frequency and keep the `top_n` most common. Boundary
    /// ties resolve by descending count, then name.
    pub fn fit(values: &[String], top_n: usize) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for value in values {
            *counts.entry(value.as_str()).or_insert(0) += 1;
        }

        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        let retained: Vec<String> = ranked
            .iter()
            .take(top_n)
            .map(|(name, _)| (*name).to_owned())
            .collect();

        let categories: BTreeSet<String> = values
            .iter()
            .map(|value| remap_with(&retained, value))
            .collect();

        Self {
            retained,
            categories: categories.into_iter().collect(),
        }
    }

    pub fn remap(&self, value: &str) -> String {
        remap_with(&self.retained, value)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Indicator column names, reference category excluded.
    pub fn encoded_columns(&self) -> Vec<String> {
        self.categories
            .iter()
            .skip(1)
            .map(|category| format!("{CITY_PREFIX}{category}"))
            .collect()
    }

    /// Replace the intermediate city column with one-hot indicator columns.
    /// Row order and count are unchanged; each row activates at most one
    /// indicator (zero when it belongs to the reference category or, under a
    /// reused vocabulary, to a category never observed at fit time).
    pub fn encode(&self, df: DataFrame) -> PolarsResult<DataFrame> {
        let city = df.column(COL_CITY_CLEAN)?.as_materialized_series();
        let city = city.str()?;
        let remapped: Vec<String> = city
            .into_iter()
            .map(|cell| self.remap(cell.unwrap_or(UNKNOWN_CATEGORY)))
            .collect();

        let mut df = df.drop(COL_CITY_CLEAN)?;
        for category in self.categories.iter().skip(1) {
            let flags: Vec<bool> = remapped.iter().map(|value| value == category).collect();
            df.with_column(Series::new(
                format!("{CITY_PREFIX}{category}").into(),
                flags,
            ))?;
        }
        Ok(df)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MincerError::MissingArtifact {
                path: path.to_path_buf(),
                remedy: "mincer preprocess",
            });
        }
        Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
    }
}

fn remap_with(retained: &[String], value: &str) -> String {
    if retained.iter().any(|kept| kept == value) {
        value.to_owned()
    } else {
        OTHER_CATEGORY.to_owned()
    }
}
