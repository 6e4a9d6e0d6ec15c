//! Salary extraction.
//!
//! Raw values look like "60 000 руб.", "от 100 000 USD" or "договорная",
//! with ordinary and non-breaking spaces mixed freely inside the digit run.
//! Parsing yields a ruble amount; rows that yield nothing are removed by the
//! separate [`DropUnparsedSalary`] stage so the drop is observable on its own.

use anyhow::Result;
use polars::prelude::*;
use regex::Regex;

use super::{RunReport, Stage};
use crate::config::CurrencyRule;
use crate::schema::{utf8_column, COL_SALARY, COL_SALARY_NUM};

pub struct SalaryStage {
    rules: Vec<CurrencyRule>,
    digits: Regex,
}

impl SalaryStage {
    /// An empty rule list disables currency detection: every amount is
    /// treated as already being in rubles.
    pub fn new(rules: Vec<CurrencyRule>) -> Self {
        Self {
            rules,
            digits: Regex::new(r"\d[\d\s\u{a0}]*").expect("valid regex"),
        }
    }

    /// Parse one raw salary cell; `None` marks the row for the filter stage.
    pub fn parse(&self, raw: &str) -> Option<f64> {
        let rate = self.rate_for(raw);
        let run = self.digits.find(raw)?;
        let cleaned: String = run
            .as_str()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        cleaned.parse::<f64>().ok().map(|amount| amount * rate)
    }

    /// First rule whose marker appears in the lowercased text wins; no
    /// marker means the amount is already in rubles.
    fn rate_for(&self, raw: &str) -> f64 {
        let lower = raw.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.markers.iter().any(|m| lower.contains(m.as_str())))
            .map_or(1.0, |rule| rule.rate)
    }
}

impl Stage for SalaryStage {
    fn name(&self) -> &'static str {
        "salary"
    }

    fn apply(&self, df: DataFrame, _report: &mut RunReport) -> Result<DataFrame> {
        let raw = utf8_column(&df, COL_SALARY)?;
        let raw = raw.str()?;
        let parsed: Vec<Option<f64>> = raw
            .into_iter()
            .map(|cell| cell.and_then(|text| self.parse(text)))
            .collect();

        let mut df = df;
        df.with_column(Series::new(COL_SALARY_NUM.into(), parsed))?;
        Ok(df)
    }
}

/// Removes rows whose salary failed to parse. The only stage permitted to
/// change the row count.
pub struct DropUnparsedSalary;

impl Stage for DropUnparsedSalary {
    fn name(&self) -> &'static str {
        "drop-unparsed-salary"
    }

    fn apply(&self, df: DataFrame, report: &mut RunReport) -> Result<DataFrame> {
        let before = df.height();
        let filtered = df.filter(&df.column(COL_SALARY_NUM)?.is_not_null())?;
        report.rows_dropped += before - filtered.height();
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;

    fn stage() -> SalaryStage {
        SalaryStage::new(PipelineConfig::default().currencies)
    }

    #[test]
    fn test_plain_rubles() {
        assert_eq!(stage().parse("60 000 руб."), Some(60000.0));
    }

    #[test]
    fn test_non_breaking_spaces_in_digit_run() {
        assert_eq!(stage().parse("от 100\u{a0}000 руб."), Some(100000.0));
    }

    #[test]
    fn test_usd_conversion() {
        assert_eq!(stage().parse("от 100 000 USD"), Some(8_500_000.0));
    }

    #[test]
    fn test_currency_precedence_tenge_before_dollar() {
        // Both markers present: tenge is checked first.
        let parsed = stage().parse("500 000 KZT ($ equivalent)").expect("parses");
        assert!((parsed - 500_000.0 * 0.021).abs() < 1e-9);
    }

    #[test]
    fn test_euro_symbol() {
        assert_eq!(stage().parse("1 000 €"), Some(90_000.0));
    }

    #[test]
    fn test_no_digits_is_unparsable() {
        assert_eq!(stage().parse("договорная"), None);
        assert_eq!(stage().parse(""), None);
    }

    #[test]
    fn test_empty_rule_list_skips_conversion() {
        let plain = SalaryStage::new(Vec::new());
        assert_eq!(plain.parse("100 000 USD"), Some(100000.0));
    }

    #[test]
    fn test_filter_drops_null_rows() -> Result<()> {
        let salary = Series::new(
            COL_SALARY.into(),
            vec![Some("60 000 руб."), None, Some("не указана")],
        );
        let df = DataFrame::new(vec![Column::from(salary)])?;

        let mut report = RunReport::default();
        let df = stage().apply(df, &mut report)?;
        let df = DropUnparsedSalary.apply(df, &mut report)?;

        assert_eq!(df.height(), 1);
        assert_eq!(report.rows_dropped, 2);
        let parsed = df.column(COL_SALARY_NUM)?.as_materialized_series();
        assert_eq!(parsed.f64()?.get(0), Some(60000.0));
        Ok(())
    }
}
