use crate::reports::{area_score_rows, area_status_rows};
use crate::types::{DashboardStats, ExecutiveSummary, IndicatorRow};
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(ไม่มีข้อมูล)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

#[derive(Debug, Serialize)]
struct SummaryFile<'a> {
    fiscal_year: &'a str,
    timeframe: &'a str,
    executive: &'a ExecutiveSummary<'a>,
    dashboard_total: usize,
    dashboard_passed: usize,
    dashboard_failed: usize,
    dashboard_pending: usize,
}

/// Write the per-area tables, the indicator table and a JSON summary into
/// `dir`. Returns the files written.
pub fn export_reports(
    dir: &Path,
    fiscal_year: &str,
    timeframe: &str,
    executive: &ExecutiveSummary<'_>,
    dashboard: &DashboardStats,
    indicators: &[IndicatorRow],
) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let path = dir.join("area_scores.csv");
    write_csv(&path, &area_score_rows(dashboard))?;
    written.push(path);

    let path = dir.join("area_status.csv");
    write_csv(&path, &area_status_rows(dashboard))?;
    written.push(path);

    let path = dir.join("indicators.csv");
    write_csv(&path, indicators)?;
    written.push(path);

    let summary = SummaryFile {
        fiscal_year,
        timeframe,
        executive,
        dashboard_total: dashboard.total,
        dashboard_passed: dashboard.passed,
        dashboard_failed: dashboard.failed,
        dashboard_pending: dashboard.pending,
    };
    let path = dir.join("summary.json");
    write_json(&path, &summary)?;
    written.push(path);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CUMULATIVE_TIMEFRAME;
    use crate::reports::{aggregate_dashboard, aggregate_executive};
    use crate::seed::default_dataset;
    use crate::view::{table_rows, view, ViewQuery};
    use tempfile::tempdir;

    #[test]
    fn exports_all_files_with_critical_indicators() {
        let dir = tempdir().unwrap();
        let data = default_dataset();
        let exec = aggregate_executive(data, "2569", CUMULATIVE_TIMEFRAME);
        let dash = aggregate_dashboard(data, "2569", CUMULATIVE_TIMEFRAME);
        let q = ViewQuery::new("2569", CUMULATIVE_TIMEFRAME);
        let rows = table_rows(&view(data, &q), &q);

        let files = export_reports(dir.path(), "2569", CUMULATIVE_TIMEFRAME, &exec, &dash, &rows).unwrap();
        assert_eq!(files.len(), 4);

        let summary: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("summary.json")).unwrap()).unwrap();
        assert_eq!(summary["executive"]["failed"], 1);
        assert_eq!(summary["executive"]["critical_indicators"][0]["id"], "5");
        assert_eq!(summary["dashboard_total"], 6);

        let csv_text = std::fs::read_to_string(dir.path().join("area_scores.csv")).unwrap();
        assert!(csv_text.starts_with("Area,AvgScore"));
        assert_eq!(csv_text.lines().count(), 9);
    }
}
