//! Input schema for hh.ru résumé dumps.
//!
//! The source headers are fixed string keys from the export format, not
//! configurable. Validating them up front turns a late column-lookup fault
//! deep inside a stage into a fast, named diagnostic at load time.

use polars::prelude::*;

use crate::error::{MincerError, Result};

/// Raw source columns (hh.ru export headers).
pub const COL_SALARY: &str = "ЗП";
pub const COL_GENDER_AGE: &str = "Пол, возраст";
pub const COL_EXPERIENCE: &str = "Опыт (двойное нажатие для полной версии)";
pub const COL_CITY: &str = "Город";
/// Job title column; only the classification flow needs it.
pub const COL_TITLE: &str = "Ищет работу на должность:";

/// Derived columns produced by the extraction chain.
pub const COL_SALARY_NUM: &str = "salary_num";
pub const COL_AGE: &str = "age";
pub const COL_EXPERIENCE_YEARS: &str = "experience_years";
pub const COL_CITY_CLEAN: &str = "city";
pub const CITY_PREFIX: &str = "city_";

/// Columns the preprocessing chain requires.
pub const REQUIRED_INPUT: [&str; 4] = [COL_SALARY, COL_GENDER_AGE, COL_EXPERIENCE, COL_CITY];

/// Check that every required raw column is present, naming the first one
/// that is not.
pub fn validate_input(df: &DataFrame) -> Result<()> {
    for name in REQUIRED_INPUT {
        require_column(df, name)?;
    }
    Ok(())
}

pub fn require_column(df: &DataFrame, name: &str) -> Result<()> {
    if df.get_column_names().iter().any(|c| c.as_str() == name) {
        Ok(())
    } else {
        Err(MincerError::Schema(format!(
            "input is missing required column '{name}'"
        )))
    }
}

/// Fetch a column as strings, casting if the reader inferred another dtype.
pub fn utf8_column(df: &DataFrame, name: &str) -> PolarsResult<Series> {
    df.column(name)?
        .as_materialized_series()
        .cast(&DataType::String)
}
