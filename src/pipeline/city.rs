//! City extraction and category encoding.
//!
//! The raw field is comma-separated with the city first ("Москва , м.
//! Арбатская , готов к переезду"). Cleanup keeps Cyrillic and Latin letters,
//! whitespace and hyphens; Latin survives so known English spellings can be
//! normalized to their Russian canonical names before ranking.

use anyhow::Result;
use polars::prelude::*;
use regex::Regex;
use std::collections::HashMap;

use super::vocab::{CityVocabulary, UNKNOWN_CATEGORY};
use super::{RunReport, Stage};
use crate::config::PipelineConfig;
use crate::schema::{utf8_column, COL_CITY, COL_CITY_CLEAN};

pub struct CityStage {
    cleaner: Regex,
    aliases: HashMap<String, String>,
    top_n: usize,
    vocabulary: Option<CityVocabulary>,
}

impl CityStage {
    /// With `vocabulary` the stage encodes against a persisted layout;
    /// without it the vocabulary is fitted from the data and surfaced in the
    /// run report for saving.
    pub fn new(config: &PipelineConfig, vocabulary: Option<CityVocabulary>) -> Self {
        Self {
            cleaner: Regex::new(r"[^а-яА-ЯёЁa-zA-Z\s-]").expect("valid regex"),
            aliases: config.city_aliases.clone(),
            top_n: config.top_cities,
            vocabulary,
        }
    }

    /// Extract and normalize one raw city cell.
    pub fn clean(&self, raw: &str) -> String {
        let head = raw.split(',').next().unwrap_or("");
        let stripped = self.cleaner.replace_all(head, "");
        let city = stripped.trim();
        if city.is_empty() {
            return UNKNOWN_CATEGORY.to_owned();
        }
        match self.aliases.get(&city.to_lowercase()) {
            Some(canonical) => canonical.clone(),
            None => city.to_owned(),
        }
    }
}

impl Stage for CityStage {
    fn name(&self) -> &'static str {
        "city"
    }

    fn apply(&self, df: DataFrame, report: &mut RunReport) -> Result<DataFrame> {
        let raw = utf8_column(&df, COL_CITY)?;
        let raw = raw.str()?;
        let cleaned: Vec<String> = raw
            .into_iter()
            .map(|cell| cell.map_or_else(|| UNKNOWN_CATEGORY.to_owned(), |text| self.clean(text)))
            .collect();

        let vocabulary = match &self.vocabulary {
            Some(vocabulary) => vocabulary.clone(),
            None => CityVocabulary::fit(&cleaned, self.top_n),
        };

        let mut df = df;
        df.with_column(Series::new(COL_CITY_CLEAN.into(), cleaned))?;
        let df = vocabulary.encode(df)?;
        report.vocabulary = Some(vocabulary);
        Ok(df)
    }
}
