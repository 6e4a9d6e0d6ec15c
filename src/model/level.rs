//! Developer-level classification (junior / middle / senior) from job titles.
//!
//! Two-step labelling keeps the training set honest: first a strict filter
//! keeps only résumés whose title names actual development work, then a
//! level is assigned from explicit title keywords only. Experience never
//! leaks into the labels, it stays a feature. Titles with no explicit level
//! are excluded rather than guessed.

use anyhow::{anyhow, bail};
use linfa::prelude::*;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2};
use polars::prelude::*;
use std::path::Path;

use crate::config::PipelineConfig;
use crate::pipeline::city::CityStage;
use crate::pipeline::experience::ExperienceStage;
use crate::pipeline::salary::SalaryStage;
use crate::pipeline::vocab::{CityVocabulary, UNKNOWN_CATEGORY};
use crate::schema::{self, COL_CITY, COL_EXPERIENCE, COL_SALARY, COL_TITLE};

pub const MODEL_FILE: &str = "level_model.json";

pub const LEVELS: [&str; 3] = ["junior", "middle", "senior"];

const DEV_KEYWORDS: &[&str] = &[
    "программист",
    "разработчик",
    "прогер",
    "разраб",
    "frontend",
    "front-end",
    "front end",
    "backend",
    "back-end",
    "back end",
    "fullstack",
    "full-stack",
    "full stack",
    "web-программист",
    "веб-программист",
    "1с",
    "1 с",
    "java",
    "python",
    "c#",
    "c++",
    "c/c++",
    "javascript",
    "js",
    "typescript",
    "golang",
    "rust",
    "ruby",
    "php",
    "flutter",
    "react",
    "vue",
    "angular",
    "django",
    "flask",
    "spring",
    "dotnet",
    ".net",
    "kotlin",
    "swift",
    "scala",
];

const NON_DEV_KEYWORDS: &[&str] = &[
    "администратор",
    "админ",
    "сисадмин",
    "инженер",
    "техник",
    "монтажник",
    "электрик",
    "механик",
    "менеджер",
    "руководитель",
    "директор",
    "начальник",
    "аналитик",
    "тестировщик",
    "qa",
    "автотест",
    "ручное тестирование",
    "дизайнер",
    "верстальщик",
    "маркетолог",
    "контент",
    "продаж",
    "поддержка",
    "консультант",
    "оператор",
    "архитектор",
    "девопс",
    "администрирование",
    "сопровождение",
];

const JUNIOR_KEYWORDS: &[&str] = &[
    "junior", "младший", "стажер", "стажёр", "trainee", "intern", "начинающий",
];
const SENIOR_KEYWORDS: &[&str] = &[
    "senior", "lead", "главный", "техлид", "архитектор", "ведущий",
];
const MIDDLE_KEYWORDS: &[&str] = &["middle", "миддл", "мидл"];

/// A title must contain a development keyword and no non-developer keyword.
/// "инженер-программист" is the one sanctioned exception to the ban list.
pub fn is_developer(title: &str) -> bool {
    let lower = title.to_lowercase();
    let has_dev = DEV_KEYWORDS.iter().any(|kw| lower.contains(kw));
    if !has_dev {
        return false;
    }
    let has_non_dev = NON_DEV_KEYWORDS.iter().any(|kw| lower.contains(kw));
    if has_non_dev && !lower.contains("инженер-программист") {
        return false;
    }
    true
}

/// Level index from explicit title keywords only; `None` means the résumé
/// carries no usable label.
pub fn extract_level(title: &str) -> Option<usize> {
    let lower = title.to_lowercase();
    if JUNIOR_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return Some(0);
    }
    if SENIOR_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return Some(2);
    }
    if MIDDLE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return Some(1);
    }
    None
}

pub struct LevelData {
    pub x: Array2<f64>,
    pub y: Array1<usize>,
    pub feature_names: Vec<String>,
}

/// Filter developer résumés, label levels, and build the feature matrix:
/// z-scored experience and salary plus city indicators.
pub fn build_dataset(df: &DataFrame, config: &PipelineConfig) -> anyhow::Result<LevelData> {
    schema::require_column(df, COL_TITLE)?;
    for name in [COL_EXPERIENCE, COL_SALARY, COL_CITY] {
        schema::require_column(df, name)?;
    }

    let titles = schema::utf8_column(df, COL_TITLE)?;
    let titles = titles.str()?;
    let experience_raw = schema::utf8_column(df, COL_EXPERIENCE)?;
    let experience_raw = experience_raw.str()?;
    let salary_raw = schema::utf8_column(df, COL_SALARY)?;
    let salary_raw = salary_raw.str()?;
    let city_raw = schema::utf8_column(df, COL_CITY)?;
    let city_raw = city_raw.str()?;

    let experience_stage = ExperienceStage::new();
    // Plain digit-run parsing; unparsable salary is a zero feature here, not
    // a dropped row.
    let salary_stage = SalaryStage::new(Vec::new());
    let city_stage = CityStage::new(config, None);

    let mut levels: Vec<usize> = Vec::new();
    let mut experience: Vec<f64> = Vec::new();
    let mut salary: Vec<f64> = Vec::new();
    let mut cities: Vec<String> = Vec::new();

    for row in 0..df.height() {
        let Some(title) = titles.get(row) else {
            continue;
        };
        if !is_developer(title) {
            continue;
        }
        let Some(level) = extract_level(title) else {
            continue;
        };

        levels.push(level);
        experience.push(
            experience_raw
                .get(row)
                .map_or(0.0, |text| experience_stage.parse(text)),
        );
        salary.push(
            salary_raw
                .get(row)
                .and_then(|text| salary_stage.parse(text))
                .unwrap_or(0.0),
        );
        cities.push(
            city_raw
                .get(row)
                .map_or_else(|| UNKNOWN_CATEGORY.to_owned(), |text| city_stage.clean(text)),
        );
    }

    if levels.is_empty() {
        bail!("no developer résumés with an explicit junior/middle/senior title found");
    }

    let vocabulary = CityVocabulary::fit(&cities, config.top_cities);
    let remapped: Vec<String> = cities.iter().map(|city| vocabulary.remap(city)).collect();

    let mut feature_names = vec!["experience_years".to_owned(), "salary_num".to_owned()];
    feature_names.extend(vocabulary.encoded_columns());

    let rows = levels.len();
    let mut x = Array2::<f64>::zeros((rows, feature_names.len()));
    let experience = standardize(&experience);
    let salary = standardize(&salary);
    for row in 0..rows {
        x[[row, 0]] = experience[row];
        x[[row, 1]] = salary[row];
    }
    for (offset, category) in vocabulary.categories().iter().skip(1).enumerate() {
        for row in 0..rows {
            if remapped[row] == *category {
                x[[row, 2 + offset]] = 1.0;
            }
        }
    }

    Ok(LevelData {
        x,
        y: Array1::from_vec(levels),
        feature_names,
    })
}

pub struct LevelReport {
    pub accuracy: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub class_counts: [usize; 3],
}

/// Train the tree classifier on an 80/20 split, report accuracy on the
/// held-out portion, and persist the fitted model.
pub fn train(data: LevelData, resources: &Path) -> anyhow::Result<LevelReport> {
    let mut class_counts = [0usize; 3];
    for &level in &data.y {
        class_counts[level] += 1;
    }
    let distinct = class_counts.iter().filter(|&&count| count > 0).count();
    if distinct < 2 {
        bail!(
            "classification needs at least two distinct levels in the data, found {distinct}"
        );
    }

    let dataset = Dataset::new(data.x, data.y);
    let (train_set, valid_set) = dataset.split_with_ratio(0.8);

    let model = DecisionTree::params()
        .max_depth(Some(15))
        .fit(&train_set)
        .map_err(|e| anyhow!("Decision tree training failed: {e}"))?;

    let prediction = model.predict(&valid_set);
    let cm = prediction.confusion_matrix(&valid_set)?;
    let accuracy = f64::from(cm.accuracy());

    std::fs::create_dir_all(resources)?;
    std::fs::write(
        resources.join(MODEL_FILE),
        serde_json::to_string(&model)?,
    )?;

    Ok(LevelReport {
        accuracy,
        train_rows: train_set.nsamples(),
        test_rows: valid_set.nsamples(),
        class_counts,
    })
}

fn standardize(values: &[f64]) -> Vec<f64> {
    let arr = Array1::from_vec(values.to_vec());
    let mean = arr.mean().unwrap_or(0.0);
    let std = arr.std(0.0);
    if std > 0.0 {
        values.iter().map(|value| (value - mean) / std).collect()
    } else {
        values.iter().map(|value| value - mean).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_developer_filter() {
        assert!(is_developer("Senior Python разработчик"));
        assert!(is_developer("Инженер-программист"));
        assert!(!is_developer("Менеджер по продажам"));
        assert!(!is_developer("Системный администратор"));
        // Development keyword plus a banned one: the ban wins.
        assert!(!is_developer("Руководитель разработки java"));
    }

    #[test]
    fn test_level_keywords() {
        assert_eq!(extract_level("Junior Java разработчик"), Some(0));
        assert_eq!(extract_level("Миддл разработчик"), Some(1));
        assert_eq!(extract_level("Ведущий программист"), Some(2));
        assert_eq!(extract_level("Программист"), None);
    }

    #[test]
    fn test_junior_beats_senior_when_both_present() {
        // Keyword checks run junior-first, mirroring the labelling policy.
        assert_eq!(extract_level("Junior developer, ведущий проектов"), Some(0));
    }

    #[test]
    fn test_standardize_zero_variance() {
        let out = standardize(&[5.0, 5.0, 5.0]);
        assert_eq!(out, vec![0.0, 0.0, 0.0]);
    }

    fn titled_frame(titles: Vec<&str>) -> DataFrame {
        let rows = titles.len();
        let title = Series::new(COL_TITLE.into(), titles);
        let experience = Series::new(
            COL_EXPERIENCE.into(),
            vec!["Опыт работы 3 года 6 месяцев"; rows],
        );
        let salary = Series::new(COL_SALARY.into(), vec!["100 000 руб."; rows]);
        let city = Series::new(COL_CITY.into(), vec!["Москва"; rows]);
        DataFrame::new(vec![
            Column::from(title),
            Column::from(experience),
            Column::from(salary),
            Column::from(city),
        ])
        .expect("valid frame")
    }

    #[test]
    fn test_build_dataset_keeps_labelled_developers_only() -> anyhow::Result<()> {
        let df = titled_frame(vec![
            "Junior Python разработчик",
            "Senior Java программист",
            "Программист",            // developer, but no explicit level
            "Менеджер по продажам",   // not a developer
        ]);

        let data = build_dataset(&df, &PipelineConfig::default())?;
        assert_eq!(data.y.len(), 2);
        assert_eq!(data.y[0], 0);
        assert_eq!(data.y[1], 2);
        assert_eq!(data.feature_names[0], "experience_years");
        Ok(())
    }

    #[test]
    fn test_no_labelled_developers_is_an_error() {
        let df = titled_frame(vec!["Бухгалтер", "Экономист"]);
        assert!(build_dataset(&df, &PipelineConfig::default()).is_err());
    }

    #[test]
    fn test_single_class_is_rejected() -> anyhow::Result<()> {
        let df = titled_frame(vec![
            "Junior Python разработчик",
            "Junior Java разработчик",
            "Junior C# разработчик",
        ]);
        let data = build_dataset(&df, &PipelineConfig::default())?;
        let dir = tempfile::tempdir()?;
        let result = train(data, dir.path());
        assert!(result.is_err());
        Ok(())
    }
}
