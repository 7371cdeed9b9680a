use crate::catalog::{short_area_label, AREAS, PROVINCIAL_AREA};
use crate::types::{
    AreaScore, AreaScoreRow, AreaStatusCount, AreaStatusRow, CriticalRow, DashboardStats,
    ExecutiveSummary, IndicatorRecord, Status,
};
use crate::util::{average, format_number, format_optional, percent, round_to};
use tracing::debug;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct StatusCounts {
    total: usize,
    passed: usize,
    failed: usize,
    pending: usize,
}

impl StatusCounts {
    fn add(&mut self, status: Status) {
        self.total += 1;
        match status {
            Status::Passed => self.passed += 1,
            Status::Failed => self.failed += 1,
            Status::Pending => self.pending += 1,
        }
    }
}

fn in_year<'a: 'b, 'b>(
    records: &'a [IndicatorRecord],
    fiscal_year: &'b str,
) -> impl Iterator<Item = &'a IndicatorRecord> + 'b {
    records.iter().filter(move |r| r.fiscal_year == fiscal_year)
}

/// Dashboard aggregation: every record of the year crossed with every area.
///
/// A (record, area) pair contributes only when a cell exists at
/// `results[timeframe][area]`; records with nothing for the timeframe add
/// nothing, not even to `pending`.
pub fn aggregate_dashboard(
    records: &[IndicatorRecord],
    fiscal_year: &str,
    timeframe: &str,
) -> DashboardStats {
    #[derive(Default)]
    struct Acc {
        scores: Vec<f64>,
        passed: usize,
        failed: usize,
    }

    let mut counts = StatusCounts::default();
    let mut per_area: Vec<Acc> = AREAS.iter().map(|_| Acc::default()).collect();

    for record in in_year(records, fiscal_year) {
        for (area, acc) in AREAS.iter().zip(per_area.iter_mut()) {
            let Some(cell) = record.cell(timeframe, area) else {
                continue;
            };
            counts.add(cell.status);
            match cell.status {
                Status::Passed => acc.passed += 1,
                Status::Failed => acc.failed += 1,
                Status::Pending => {}
            }
            if let Some(score) = cell.score {
                acc.scores.push(score);
            }
        }
    }
    debug!(
        fiscal_year,
        timeframe,
        cells = counts.total,
        "dashboard aggregation"
    );

    let area_scores = AREAS
        .iter()
        .zip(per_area.iter())
        .map(|(area, acc)| AreaScore {
            area: area.to_string(),
            avg_score: round_to(average(&acc.scores), 2),
        })
        .collect();
    let area_status = AREAS
        .iter()
        .zip(per_area.iter())
        .map(|(area, acc)| AreaStatusCount {
            area: area.to_string(),
            passed: acc.passed,
            failed: acc.failed,
        })
        .collect();

    DashboardStats {
        total: counts.total,
        passed: counts.passed,
        failed: counts.failed,
        pending: counts.pending,
        area_scores,
        area_status,
    }
}

/// Executive aggregation: one provincial-level cell per record.
///
/// Records failing at the provincial level are the critical indicators, kept
/// in source order.
pub fn aggregate_executive<'a>(
    records: &'a [IndicatorRecord],
    fiscal_year: &str,
    timeframe: &str,
) -> ExecutiveSummary<'a> {
    let mut counts = StatusCounts::default();
    let mut scores = Vec::new();
    let mut critical_indicators = Vec::new();

    for record in in_year(records, fiscal_year) {
        let Some(cell) = record.cell(timeframe, PROVINCIAL_AREA) else {
            continue;
        };
        counts.add(cell.status);
        if cell.status == Status::Failed {
            critical_indicators.push(record);
        }
        if let Some(score) = cell.score {
            scores.push(score);
        }
    }
    debug!(
        fiscal_year,
        timeframe,
        indicators = counts.total,
        critical = critical_indicators.len(),
        "executive aggregation"
    );

    ExecutiveSummary {
        total: counts.total,
        passed: counts.passed,
        failed: counts.failed,
        pending: counts.pending,
        success_rate: percent(counts.passed, counts.total),
        avg_score: format!("{:.2}", average(&scores)),
        critical_indicators,
    }
}

pub fn area_score_rows(stats: &DashboardStats) -> Vec<AreaScoreRow> {
    stats
        .area_scores
        .iter()
        .map(|a| AreaScoreRow {
            area: short_area_label(&a.area).to_string(),
            avg_score: format_number(a.avg_score, 2),
        })
        .collect()
}

pub fn area_status_rows(stats: &DashboardStats) -> Vec<AreaStatusRow> {
    stats
        .area_status
        .iter()
        .map(|a| AreaStatusRow {
            area: short_area_label(&a.area).to_string(),
            passed: a.passed,
            failed: a.failed,
        })
        .collect()
}

pub fn critical_rows(summary: &ExecutiveSummary<'_>, timeframe: &str) -> Vec<CriticalRow> {
    summary
        .critical_indicators
        .iter()
        .map(|r| CriticalRow {
            order: r.order.to_string(),
            name: r.name.clone(),
            responsible_group: r.responsible_group.clone(),
            score: format_optional(r.score_at(timeframe, PROVINCIAL_AREA)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CUMULATIVE_TIMEFRAME, TIMEFRAMES};
    use crate::types::ResultCell;
    use proptest::prelude::*;

    fn cell(area: &str, score: Option<f64>, status: Status) -> ResultCell {
        ResultCell {
            area_name: area.to_string(),
            score,
            status,
            ..ResultCell::default()
        }
    }

    fn record(id: &str, year: &str, cells: &[(&str, &str, Option<f64>, Status)]) -> IndicatorRecord {
        let mut r = IndicatorRecord {
            id: id.to_string(),
            name: format!("indicator {id}"),
            fiscal_year: year.to_string(),
            ..Default::default()
        };
        for (tf, area, score, status) in cells {
            r.results
                .entry(tf.to_string())
                .or_default()
                .insert(area.to_string(), cell(area, *score, *status));
        }
        r
    }

    const TF: &str = CUMULATIVE_TIMEFRAME;
    const MUEANG: &str = "คปสอ.เมือง";

    #[test]
    fn dashboard_counts_every_present_cell() {
        let data = vec![
            record(
                "1",
                "2569",
                &[
                    (TF, PROVINCIAL_AREA, Some(5.0), Status::Passed),
                    (TF, MUEANG, Some(3.0), Status::Passed),
                    (TF, "คปสอ.ควนโดน", Some(1.0), Status::Failed),
                ],
            ),
            record("2", "2569", &[(TF, PROVINCIAL_AREA, Some(0.0), Status::Pending)]),
            record("3", "2568", &[(TF, PROVINCIAL_AREA, Some(1.0), Status::Failed)]),
        ];
        let stats = aggregate_dashboard(&data, "2569", TF);
        assert_eq!((stats.total, stats.passed, stats.failed, stats.pending), (4, 2, 1, 1));
        assert_eq!(stats.area_scores.len(), AREAS.len());
        assert_eq!(stats.area_scores[0].avg_score, 2.5);
        assert_eq!(stats.area_scores[1].avg_score, 3.0);
        assert_eq!(stats.area_scores[7].avg_score, 0.0);
        assert_eq!(stats.area_status[2].failed, 1);
        assert_eq!(stats.area_status[0].passed, 1);
    }

    #[test]
    fn record_without_timeframe_contributes_nothing() {
        let data = vec![record("1", "2569", &[("ตุลาคม", PROVINCIAL_AREA, Some(4.0), Status::Passed)])];
        let stats = aggregate_dashboard(&data, "2569", TF);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.pending, 0);
        let exec = aggregate_executive(&data, "2569", TF);
        assert_eq!(exec.total, 0);
        assert_eq!(exec.success_rate, 0);
        assert_eq!(exec.avg_score, "0.00");
    }

    #[test]
    fn area_mean_skips_absent_scores() {
        let data = vec![
            record("1", "2569", &[(TF, MUEANG, Some(4.0), Status::Passed)]),
            record("2", "2569", &[(TF, MUEANG, None, Status::Pending)]),
            record("3", "2569", &[(TF, MUEANG, Some(1.0), Status::Failed)]),
        ];
        let stats = aggregate_dashboard(&data, "2569", TF);
        assert_eq!(stats.area_scores[1].avg_score, 2.5);
        assert_eq!(stats.total, 3);
    }

    #[test]
    fn executive_reads_only_provincial_level() {
        let data = vec![
            record(
                "1",
                "2569",
                &[
                    (TF, PROVINCIAL_AREA, Some(4.0), Status::Passed),
                    (TF, MUEANG, Some(1.0), Status::Failed),
                ],
            ),
            record("2", "2569", &[(TF, PROVINCIAL_AREA, Some(1.0), Status::Failed)]),
            record("3", "2569", &[(TF, PROVINCIAL_AREA, None, Status::Pending)]),
        ];
        let exec = aggregate_executive(&data, "2569", TF);
        assert_eq!((exec.total, exec.passed, exec.failed, exec.pending), (3, 1, 1, 1));
        assert_eq!(exec.success_rate, 33);
        assert_eq!(exec.avg_score, "2.50");
        let ids: Vec<&str> = exec.critical_indicators.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2"]);
    }

    #[test]
    fn executive_ignores_other_fiscal_years() {
        let data = vec![
            record("1", "2568", &[(TF, PROVINCIAL_AREA, Some(1.0), Status::Failed)]),
            record("2", "2569", &[(TF, PROVINCIAL_AREA, Some(5.0), Status::Passed)]),
        ];
        let exec = aggregate_executive(&data, "2569", TF);
        assert_eq!((exec.total, exec.passed, exec.failed), (1, 1, 0));
        assert!(exec.critical_indicators.is_empty());
        assert_eq!(exec.avg_score, "5.00");
    }

    #[test]
    fn aggregation_does_not_touch_input() {
        let data = vec![record("1", "2569", &[(TF, PROVINCIAL_AREA, Some(1.0), Status::Failed)])];
        let before = data.clone();
        let _ = aggregate_dashboard(&data, "2569", TF);
        let _ = aggregate_executive(&data, "2569", TF);
        assert_eq!(data, before);
    }

    #[test]
    fn display_rows_use_short_area_labels() {
        let data = vec![record("1", "2569", &[(TF, MUEANG, Some(4.0), Status::Passed)])];
        let stats = aggregate_dashboard(&data, "2569", TF);
        let scores = area_score_rows(&stats);
        assert_eq!(scores[1].area, "เมือง");
        assert_eq!(scores[1].avg_score, "4.00");
        let status = area_status_rows(&stats);
        assert_eq!(status[1].passed, 1);
    }

    fn arb_status() -> impl Strategy<Value = Status> {
        prop_oneof![Just(Status::Passed), Just(Status::Failed), Just(Status::Pending)]
    }

    fn arb_records() -> impl Strategy<Value = Vec<IndicatorRecord>> {
        let cell = (
            0..TIMEFRAMES.len(),
            0..AREAS.len(),
            proptest::option::of(0.0f64..5.0),
            arb_status(),
        );
        let rec = (
            prop_oneof![Just("2568"), Just("2569")],
            proptest::collection::vec(cell, 0..12),
        );
        proptest::collection::vec(rec, 0..10).prop_map(|recs| {
            recs.into_iter()
                .enumerate()
                .map(|(i, (year, cells))| {
                    let cells: Vec<(&str, &str, Option<f64>, Status)> = cells
                        .into_iter()
                        .map(|(t, a, s, st)| (TIMEFRAMES[t], AREAS[a], s, st))
                        .collect();
                    record(&i.to_string(), year, &cells)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn counts_always_add_up(data in arb_records(), tf in 0..TIMEFRAMES.len()) {
            for year in ["2568", "2569"] {
                let d = aggregate_dashboard(&data, year, TIMEFRAMES[tf]);
                prop_assert_eq!(d.total, d.passed + d.failed + d.pending);
                let e = aggregate_executive(&data, year, TIMEFRAMES[tf]);
                prop_assert_eq!(e.total, e.passed + e.failed + e.pending);
                prop_assert_eq!(e.critical_indicators.len(), e.failed);
            }
        }

        #[test]
        fn success_rate_matches_formula(data in arb_records(), tf in 0..TIMEFRAMES.len()) {
            let e = aggregate_executive(&data, "2569", TIMEFRAMES[tf]);
            if e.total == 0 {
                prop_assert_eq!(e.success_rate, 0);
            } else {
                let expected = (100.0 * e.passed as f64 / e.total as f64).round() as u32;
                prop_assert_eq!(e.success_rate, expected);
            }
        }
    }
}
