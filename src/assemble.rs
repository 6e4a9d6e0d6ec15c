//! Final output assembly: annotated table → model-ready arrays.
//!
//! Feature order is fixed as age, experience, then every `city_*` indicator
//! in table order. Remaining gaps become zeros; the target must already be
//! gap-free because the filter stage owns row removal.

use ndarray::{Array1, Array2};
use polars::prelude::*;

use crate::error::{MincerError, Result};
use crate::schema::{CITY_PREFIX, COL_AGE, COL_EXPERIENCE_YEARS, COL_SALARY_NUM};

#[derive(Debug)]
pub struct ModelArrays {
    pub x: Array2<f64>,
    pub y: Array1<f64>,
    pub feature_names: Vec<String>,
}

pub fn assemble(df: &DataFrame) -> Result<ModelArrays> {
    for required in [COL_AGE, COL_EXPERIENCE_YEARS, COL_SALARY_NUM] {
        if !df.get_column_names().iter().any(|name| name.as_str() == required) {
            return Err(MincerError::PipelineOrder(
                "output assembly requested before the extraction chain has run",
            ));
        }
    }

    let mut feature_names: Vec<String> =
        vec![COL_AGE.to_owned(), COL_EXPERIENCE_YEARS.to_owned()];
    feature_names.extend(
        df.get_column_names()
            .iter()
            .filter(|name| name.starts_with(CITY_PREFIX))
            .map(|name| name.to_string()),
    );

    let mut numeric = Vec::with_capacity(feature_names.len());
    for name in &feature_names {
        let series = df
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::Float64)?
            .fill_null(FillNullStrategy::Zero)?;
        numeric.push(Column::from(series));
    }
    let x = DataFrame::new(numeric)?.to_ndarray::<Float64Type>(IndexOrder::C)?;

    let target = df.column(COL_SALARY_NUM)?.as_materialized_series();
    if target.null_count() > 0 {
        return Err(MincerError::PipelineOrder(
            "target column still contains unparsed salaries; the filter stage has not run",
        ));
    }
    let y: Array1<f64> = target
        .cast(&DataType::Float64)?
        .f64()?
        .into_no_null_iter()
        .collect();

    Ok(ModelArrays {
        x,
        y,
        feature_names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotated_frame() -> DataFrame {
        let age = Series::new(COL_AGE.into(), vec![Some(42.0), None]);
        let years = Series::new(COL_EXPERIENCE_YEARS.into(), vec![5.0, 3.5]);
        let city = Series::new("city_Москва".into(), vec![true, false]);
        let salary = Series::new(COL_SALARY_NUM.into(), vec![60_000.0, 85_000.0]);
        DataFrame::new(vec![
            Column::from(age),
            Column::from(years),
            Column::from(city),
            Column::from(salary),
        ])
        .expect("valid frame")
    }

    #[test]
    fn test_shapes_and_feature_order() -> Result<()> {
        let arrays = assemble(&annotated_frame())?;
        assert_eq!(arrays.x.dim(), (2, 3));
        assert_eq!(arrays.y.len(), 2);
        assert_eq!(
            arrays.feature_names,
            vec![COL_AGE, COL_EXPERIENCE_YEARS, "city_Москва"]
        );
        Ok(())
    }

    #[test]
    fn test_remaining_gaps_become_zero() -> Result<()> {
        let arrays = assemble(&annotated_frame())?;
        assert_eq!(arrays.x[[1, 0]], 0.0, "null age cell filled with zero");
        assert_eq!(arrays.x[[0, 2]], 1.0, "boolean indicator cast to 1.0");
        Ok(())
    }

    #[test]
    fn test_raw_table_is_rejected() {
        let raw = DataFrame::new(vec![Column::from(Series::new(
            "ЗП".into(),
            vec!["60 000 руб."],
        ))])
        .expect("valid frame");

        let err = assemble(&raw).expect_err("should fail");
        assert!(matches!(err, MincerError::PipelineOrder(_)));
    }

    #[test]
    fn test_unfiltered_target_is_rejected() {
        let df = annotated_frame();
        let salary = Series::new(COL_SALARY_NUM.into(), vec![Some(60_000.0), None]);
        let mut df = df;
        df.with_column(salary).expect("replace column");

        let err = assemble(&df).expect_err("should fail");
        assert!(matches!(err, MincerError::PipelineOrder(_)));
    }
}
