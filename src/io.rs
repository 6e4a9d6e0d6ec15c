//! Table ingestion and array artifact persistence.
//!
//! Input is a delimited-text dump read eagerly through the lazy CSV scanner;
//! outputs are `.npy` files so the feature matrix and target vector stay
//! valid binary arrays for any downstream consumer.

use ndarray::{Array1, Array2};
use ndarray_npy::{read_npy, write_npy};
use polars::prelude::*;
use std::path::Path;

use crate::error::{MincerError, Result};

/// Load the raw résumé table from a CSV file.
pub fn load_table(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(MincerError::InvalidPath(path.to_path_buf()));
    }

    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(10000))
        .finish()?
        .collect()?;

    log::info!("loaded {} rows from {}", df.height(), path.display());
    Ok(df)
}

pub fn write_matrix(path: &Path, matrix: &Array2<f64>) -> Result<()> {
    write_npy(path, matrix)?;
    Ok(())
}

pub fn write_vector(path: &Path, vector: &Array1<f64>) -> Result<()> {
    write_npy(path, vector)?;
    Ok(())
}

/// Read a feature matrix produced by `mincer preprocess`.
pub fn read_matrix(path: &Path) -> Result<Array2<f64>> {
    if !path.exists() {
        return Err(MincerError::MissingArtifact {
            path: path.to_path_buf(),
            remedy: "mincer preprocess",
        });
    }
    Ok(read_npy(path)?)
}

/// Read a target vector produced by `mincer preprocess`.
pub fn read_vector(path: &Path) -> Result<Array1<f64>> {
    if !path.exists() {
        return Err(MincerError::MissingArtifact {
            path: path.to_path_buf(),
            remedy: "mincer preprocess",
        });
    }
    Ok(read_npy(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_array_roundtrip() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let x_path = dir.path().join("x_data.npy");
        let y_path = dir.path().join("y_data.npy");

        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let y = array![10.0, 20.0];
        write_matrix(&x_path, &x)?;
        write_vector(&y_path, &y)?;

        assert_eq!(read_matrix(&x_path)?, x);
        assert_eq!(read_vector(&y_path)?, y);
        Ok(())
    }

    #[test]
    fn test_missing_matrix_names_remedy() {
        let err = read_matrix(Path::new("does_not_exist.npy")).expect_err("should fail");
        assert!(err.to_string().contains("mincer preprocess"));
    }

    #[test]
    fn test_missing_csv_is_invalid_path() {
        let err = load_table(Path::new("no_such_dump.csv")).expect_err("should fail");
        assert!(matches!(err, MincerError::InvalidPath(_)));
    }

    #[test]
    fn test_load_table_reads_header() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("dump.csv");
        std::fs::write(&path, "a,b\n1,x\n2,y\n")?;

        let df = load_table(&path)?;
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
        Ok(())
    }
}
