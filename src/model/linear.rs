//! Salary regression: ordinary least squares via linfa.
//!
//! The fitted model is persisted as two plain arrays (weight vector + bias
//! scalar) rather than a serialized model object, so prediction only needs a
//! dot product and any consumer can read the artifacts.

use anyhow::anyhow;
use linfa::prelude::*;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2, Axis};
use std::path::Path;

use crate::error::{MincerError, Result};
use crate::io;

pub const WEIGHTS_FILE: &str = "weights.npy";
pub const BIAS_FILE: &str = "bias.npy";

#[derive(Debug)]
pub struct SalaryModel {
    pub weights: Array1<f64>,
    pub bias: f64,
}

pub struct FitReport {
    pub mse: f64,
    pub rmse: f64,
    pub r2: f64,
}

impl SalaryModel {
    pub fn fit(x: Array2<f64>, y: Array1<f64>) -> anyhow::Result<(Self, FitReport)> {
        if y.is_empty() {
            return Err(anyhow!("cannot train on an empty dataset"));
        }

        let dataset = Dataset::new(x, y);
        let model = LinearRegression::default()
            .fit(&dataset)
            .map_err(|e| anyhow!("Linear regression training failed: {e}"))?;

        let prediction = model.predict(&dataset);
        let mse = prediction.mean_squared_error(&dataset)?;
        let report = FitReport {
            mse,
            rmse: mse.sqrt(),
            r2: prediction.r2(&dataset)?,
        };

        Ok((
            Self {
                weights: model.params().to_owned(),
                bias: model.intercept(),
            },
            report,
        ))
    }

    pub fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        x.dot(&self.weights) + self.bias
    }

    pub fn save(&self, resources: &Path) -> Result<()> {
        std::fs::create_dir_all(resources)?;
        io::write_vector(&resources.join(WEIGHTS_FILE), &self.weights)?;
        io::write_vector(&resources.join(BIAS_FILE), &Array1::from(vec![self.bias]))?;
        Ok(())
    }

    pub fn load(resources: &Path) -> Result<Self> {
        let weights_path = resources.join(WEIGHTS_FILE);
        let bias_path = resources.join(BIAS_FILE);
        for path in [&weights_path, &bias_path] {
            if !path.exists() {
                return Err(MincerError::MissingArtifact {
                    path: path.clone(),
                    remedy: "mincer train",
                });
            }
        }

        let weights: Array1<f64> = ndarray_npy::read_npy(&weights_path)?;
        let bias: Array1<f64> = ndarray_npy::read_npy(&bias_path)?;
        let bias = bias
            .first()
            .copied()
            .ok_or_else(|| MincerError::Data("bias artifact is empty".to_owned()))?;

        Ok(Self { weights, bias })
    }
}

/// Keep only rows whose target lies in `[floor, ceil]`. hh.ru dumps carry
/// placeholder salaries at the bottom and data-entry anomalies at the top,
/// and both dominate a least-squares fit.
pub fn filter_target_range(
    x: &Array2<f64>,
    y: &Array1<f64>,
    floor: f64,
    ceil: f64,
) -> (Array2<f64>, Array1<f64>) {
    let keep: Vec<usize> = y
        .iter()
        .enumerate()
        .filter(|(_, value)| **value >= floor && **value <= ceil)
        .map(|(index, _)| index)
        .collect();
    (x.select(Axis(0), &keep), y.select(Axis(0), &keep))
}
