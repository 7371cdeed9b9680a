use crate::evaluate::is_consistent;
use crate::notify::{Notifier, NotifyKind, NotifyOptions};
use crate::seed::{default_dataset, default_for_year};
use crate::store::IndicatorStore;
use crate::types::{IndicatorRecord, StoredIndicator};
use tracing::{info, warn};

/// Where the loaded records came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Rows read from the table.
    Store,
    /// The year was empty and has just been seeded from the bundle.
    Seeded,
    /// The table could not be read; bundled records of the year.
    Fallback,
    /// Seeding failed; the whole bundle, every year.
    FallbackAll,
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub fiscal_year: String,
    pub source: LoadSource,
    pub total_rows: usize,
    /// Records carrying timeframe/area keys outside the enumerations.
    pub malformed_rows: usize,
    /// Cells whose stored status disagrees with their score.
    pub inconsistent_cells: usize,
}

/// Load every indicator of `fiscal_year`, seeding the year from the bundled
/// dataset the first time it is found empty.
///
/// Never fails: storage errors degrade to bundled data plus an error
/// notification.
pub fn load_fiscal_year(
    store: &mut dyn IndicatorStore,
    notifier: &mut dyn Notifier,
    fiscal_year: &str,
) -> (Vec<IndicatorRecord>, LoadReport) {
    let (records, source) = match store.list(fiscal_year) {
        Ok(rows) if !rows.is_empty() => (
            rows.into_iter().map(IndicatorRecord::from).collect(),
            LoadSource::Store,
        ),
        Ok(_) => seed_year(store, fiscal_year),
        Err(e) => {
            warn!(fiscal_year, "loading indicators failed, using bundled data: {}", e);
            notifier.notify(
                NotifyKind::Error,
                "โหลดข้อมูลไม่สำเร็จ",
                &format!("ไม่สามารถเชื่อมต่อฐานข้อมูลได้ แสดงข้อมูลตัวอย่างแทน ({})", e),
                NotifyOptions::default(),
            );
            (default_for_year(fiscal_year), LoadSource::Fallback)
        }
    };

    let malformed_rows = records.iter().filter(|r| r.unknown_key_count() > 0).count();
    for r in records.iter().filter(|r| r.unknown_key_count() > 0) {
        warn!(id = %r.id, unknown_keys = r.unknown_key_count(), "indicator has results outside the known timeframes/areas");
    }
    let inconsistent_cells = records
        .iter()
        .flat_map(|r| r.results.values())
        .flat_map(|areas| areas.values())
        .filter(|c| !is_consistent(c))
        .count();
    let report = LoadReport {
        fiscal_year: fiscal_year.to_string(),
        source,
        total_rows: records.len(),
        malformed_rows,
        inconsistent_cells,
    };
    info!(
        fiscal_year,
        source = ?report.source,
        rows = report.total_rows,
        inconsistent_cells,
        "indicators loaded"
    );
    (records, report)
}

fn seed_year(store: &mut dyn IndicatorStore, fiscal_year: &str) -> (Vec<IndicatorRecord>, LoadSource) {
    let bundled = default_for_year(fiscal_year);
    if bundled.is_empty() {
        info!(fiscal_year, "fiscal year is empty and has no bundled indicators");
        return (bundled, LoadSource::Seeded);
    }
    let rows: Vec<StoredIndicator> = bundled.iter().map(StoredIndicator::from).collect();
    match store.insert(&rows) {
        Ok(()) => {
            info!(fiscal_year, rows = rows.len(), "seeded fiscal year from bundled indicators");
            (bundled, LoadSource::Seeded)
        }
        Err(e) => {
            warn!(fiscal_year, "seeding failed, using the full bundled dataset: {}", e);
            (default_dataset().to_vec(), LoadSource::FallbackAll)
        }
    }
}
