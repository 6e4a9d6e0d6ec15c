//! Pipeline configuration.
//!
//! Everything here has a sensible default baked in; a JSON file can override
//! the lot for a non-standard dump. Rates are fixed approximations to rubles,
//! not live exchange data.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;

/// One currency detection rule: if any marker substring appears in the
/// lowercased salary text, the extracted amount is multiplied by `rate`.
/// Rules are checked in order; the first match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyRule {
    pub markers: Vec<String>,
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Ordered currency detection rules. An empty list disables currency
    /// detection entirely: every salary parses at multiplier 1.0.
    pub currencies: Vec<CurrencyRule>,

    /// How many of the most frequent city values keep their own category;
    /// the rest collapse into "Other".
    pub top_cities: usize,

    /// Lowercased English city spellings mapped to their Russian canonical
    /// names, applied after character cleanup.
    pub city_aliases: HashMap<String, String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            currencies: vec![
                CurrencyRule {
                    markers: vec!["kzt".to_owned()],
                    rate: 0.021,
                },
                CurrencyRule {
                    markers: vec!["eur".to_owned(), "€".to_owned()],
                    rate: 90.0,
                },
                CurrencyRule {
                    markers: vec!["usd".to_owned(), "$".to_owned()],
                    rate: 85.0,
                },
            ],
            top_cities: 10,
            city_aliases: HashMap::from([
                ("moscow".to_owned(), "Москва".to_owned()),
                ("saint petersburg".to_owned(), "Санкт-Петербург".to_owned()),
                ("spb".to_owned(), "Санкт-Петербург".to_owned()),
            ]),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration override from a JSON file. Missing keys fall
    /// back to the defaults via `#[serde(default)]`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_currency_order() {
        let config = PipelineConfig::default();
        assert_eq!(config.currencies.len(), 3);
        // Tenge first, then euro, then dollar: precedence is positional.
        assert!(config.currencies[0].markers.contains(&"kzt".to_owned()));
        assert!(config.currencies[1].markers.contains(&"€".to_owned()));
        assert!(config.currencies[2].markers.contains(&"$".to_owned()));
        assert_eq!(config.top_cities, 10);
    }

    #[test]
    fn test_partial_json_override() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"top_cities": 5}"#).expect("valid json");
        assert_eq!(config.top_cities, 5);
        assert_eq!(config.currencies.len(), 3, "defaults preserved");
    }

    #[test]
    fn test_alias_lookup() {
        let config = PipelineConfig::default();
        assert_eq!(
            config.city_aliases.get("spb").map(String::as_str),
            Some("Санкт-Петербург")
        );
    }
}
