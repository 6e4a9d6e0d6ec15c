//! End-to-end tests: CSV dump on disk through the full chain to the array
//! artifacts, and the train/predict flow over them.

use mincer::assemble::assemble;
use mincer::config::PipelineConfig;
use mincer::model::linear::SalaryModel;
use mincer::pipeline::vocab::CityVocabulary;
use mincer::pipeline::Pipeline;
use mincer::{io, schema};
use std::path::Path;

const EXPERIENCE_HEADER: &str = "Опыт (двойное нажатие для полной версии)";

fn sample_csv() -> String {
    let mut csv = format!("ЗП,\"Пол, возраст\",{EXPERIENCE_HEADER},Город\n");
    csv.push_str(
        "60 000 руб.,\"Мужчина , 42 года , родился 6 октября 1976\",Опыт работы 5 лет,\"Москва , м. Арбатская\"\n",
    );
    csv.push_str("договорная,\"Женщина , 25 лет\",Опыт работы 2 года,Казань\n");
    csv.push_str(
        "от 100 000 USD,\"Женщина , 30 лет\",Опыт работы 3 года 6 месяцев,spb\n",
    );
    csv
}

fn write_sample(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("hh.csv");
    std::fs::write(&path, sample_csv()).expect("write csv");
    path
}

#[test]
fn test_end_to_end_preprocessing() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let csv_path = write_sample(dir.path());

    let df = io::load_table(&csv_path)?;
    schema::validate_input(&df)?;
    assert_eq!(df.height(), 3);

    let pipeline = Pipeline::standard(&PipelineConfig::default(), None);
    let (df, report) = pipeline.run(df)?;
    assert_eq!(report.rows_dropped, 1, "the 'договорная' row is unparsable");

    let arrays = assemble(&df)?;
    assert_eq!(arrays.y.len(), 2);

    let retained_cities = report
        .vocabulary
        .as_ref()
        .expect("vocabulary fitted")
        .encoded_columns()
        .len();
    assert_eq!(arrays.x.dim(), (2, 2 + retained_cities));

    // Row 1: 60 000 rubles as-is; row 2: 100 000 USD at the fixed 85.0 rate.
    assert_eq!(arrays.y[0], 60_000.0);
    assert_eq!(arrays.y[1], 8_500_000.0);

    // age, experience for the surviving rows
    assert_eq!(arrays.x[[0, 0]], 42.0);
    assert_eq!(arrays.x[[0, 1]], 5.0);
    assert_eq!(arrays.x[[1, 0]], 30.0);
    assert_eq!(arrays.x[[1, 1]], 3.5);

    // One-hot invariant: at most one active indicator per row.
    for row in 0..arrays.x.nrows() {
        let active: f64 = (2..arrays.x.ncols()).map(|col| arrays.x[[row, col]]).sum();
        assert!(active <= 1.0);
    }

    // Persist the arrays next to the input, the way the CLI does.
    let x_path = dir.path().join("x_data.npy");
    let y_path = dir.path().join("y_data.npy");
    io::write_matrix(&x_path, &arrays.x)?;
    io::write_vector(&y_path, &arrays.y)?;
    assert_eq!(io::read_matrix(&x_path)?, arrays.x);
    assert_eq!(io::read_vector(&y_path)?, arrays.y);
    Ok(())
}

#[test]
fn test_vocabulary_artifact_fixes_column_layout() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let csv_path = write_sample(dir.path());

    let config = PipelineConfig::default();
    let df = io::load_table(&csv_path)?;
    let (_, report) = Pipeline::standard(&config, None).run(df)?;
    let vocabulary = report.vocabulary.expect("vocabulary fitted");

    let vocab_path = dir.path().join("city_vocab.json");
    vocabulary.save(&vocab_path)?;

    // An "inference" dump with different city frequencies: reusing the
    // persisted vocabulary must reproduce the training column layout.
    let mut csv = format!("ЗП,\"Пол, возраст\",{EXPERIENCE_HEADER},Город\n");
    csv.push_str("90 000 руб.,\"Мужчина , 33 года\",Опыт работы 4 года,Владивосток\n");
    csv.push_str("120 000 руб.,\"Женщина , 41 лет\",Опыт работы 10 лет,Владивосток\n");
    let inference_path = dir.path().join("hh_inference.csv");
    std::fs::write(&inference_path, csv)?;

    let loaded = CityVocabulary::load(&vocab_path)?;
    let df = io::load_table(&inference_path)?;
    let (df, _) = Pipeline::standard(&config, Some(loaded.clone())).run(df)?;

    for name in loaded.encoded_columns() {
        assert!(df.column(&name).is_ok(), "missing column {name}");
    }
    Ok(())
}

#[test]
fn test_train_then_predict_flow() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let resources = dir.path().join("resources");

    // Predicting before training fails with the remedial command.
    let err = SalaryModel::load(&resources).expect_err("no weights yet");
    assert!(err.to_string().contains("mincer train"));

    // Synthetic but salary-shaped data: y = 30_000 + 10_000 * experience.
    let rows = 50;
    let x = ndarray::Array2::from_shape_fn((rows, 2), |(i, j)| match j {
        0 => 20.0 + (i % 20) as f64, // age
        _ => (i % 10) as f64,        // experience
    });
    let y = ndarray::Array1::from_shape_fn(rows, |i| 30_000.0 + 10_000.0 * ((i % 10) as f64));

    let (model, report) = SalaryModel::fit(x.clone(), y.clone())?;
    assert!(report.r2 > 0.99, "synthetic data is exactly linear");
    model.save(&resources)?;

    let loaded = SalaryModel::load(&resources)?;
    let predicted = loaded.predict(&x);
    for (lhs, rhs) in predicted.iter().zip(y.iter()) {
        assert!((lhs - rhs).abs() < 1.0, "{lhs} vs {rhs}");
    }
    Ok(())
}
