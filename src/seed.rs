// Bundled default indicators, used to seed an empty fiscal year and as the
// fallback when the table cannot be reached.
use crate::types::IndicatorRecord;
use once_cell::sync::Lazy;
use tracing::error;

const DEFAULT_INDICATORS_JSON: &str = include_str!("../data/default_indicators.json");

static DEFAULT_DATASET: Lazy<Vec<IndicatorRecord>> =
    Lazy::new(|| match serde_json::from_str(DEFAULT_INDICATORS_JSON) {
        Ok(records) => records,
        Err(e) => {
            error!("bundled default indicators are invalid: {}", e);
            Vec::new()
        }
    });

/// The full bundled dataset, every fiscal year.
pub fn default_dataset() -> &'static [IndicatorRecord] {
    &DEFAULT_DATASET
}

/// Bundled records of one fiscal year.
pub fn default_for_year(fiscal_year: &str) -> Vec<IndicatorRecord> {
    DEFAULT_DATASET
        .iter()
        .filter(|r| r.fiscal_year == fiscal_year)
        .cloned()
        .collect()
}
