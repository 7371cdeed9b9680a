use kpi_tracker::catalog::{CUMULATIVE_TIMEFRAME, PROVINCIAL_AREA};
use kpi_tracker::edit::{apply_edit, EditField};
use kpi_tracker::error::StoreError;
use kpi_tracker::loader::LoadSource;
use kpi_tracker::notify::{NotifyKind, RecordingNotifier};
use kpi_tracker::reports::aggregate_executive;
use kpi_tracker::session::Session;
use kpi_tracker::store::{IndicatorStore, JsonFileStore};
use kpi_tracker::types::{IndicatorRecord, OrderKey, ResultCell, Status, StoredIndicator};
use kpi_tracker::view::{view, SortKey, ViewQuery};
use tempfile::tempdir;

const TF: &str = CUMULATIVE_TIMEFRAME;

fn indicator(id: &str, order: OrderKey, name: &str, year: &str, provincial: Option<(Option<f64>, Status)>) -> IndicatorRecord {
    let mut r = IndicatorRecord {
        id: id.to_string(),
        order,
        name: name.to_string(),
        fiscal_year: year.to_string(),
        ..Default::default()
    };
    if let Some((score, status)) = provincial {
        r.results.entry(TF.to_string()).or_default().insert(
            PROVINCIAL_AREA.to_string(),
            ResultCell {
                area_name: PROVINCIAL_AREA.to_string(),
                score,
                status,
                ..ResultCell::default()
            },
        );
    }
    r
}

#[test]
fn executive_summary_with_one_failing_indicator() {
    let data = vec![
        indicator("a", OrderKey::Number(1.0), "first", "2569", Some((Some(4.0), Status::Passed))),
        indicator("b", OrderKey::Number(2.0), "second", "2569", Some((Some(1.0), Status::Failed))),
        indicator("c", OrderKey::Number(3.0), "third", "2569", Some((Some(5.0), Status::Passed))),
    ];
    let exec = aggregate_executive(&data, "2569", TF);
    assert_eq!(exec.total, 3);
    assert_eq!(exec.passed, 2);
    assert_eq!(exec.failed, 1);
    assert_eq!(exec.pending, 0);
    assert_eq!(exec.success_rate, 67);
    assert_eq!(exec.avg_score, "3.33");
    assert_eq!(exec.critical_indicators.len(), 1);
    assert_eq!(exec.critical_indicators[0].id, "b");
}

#[test]
fn search_matches_order_substring_and_name() {
    let data = vec![
        indicator("1", OrderKey::Number(1.0), "อัตราการฝากครรภ์", "2569", None),
        indicator("2", OrderKey::Number(2.0), "ภาวะโลหิตจาง", "2569", None),
        indicator("7.1", OrderKey::Text("7.1".into()), "เบาหวานชนิดที่ 2", "2569", None),
    ];
    let mut q = ViewQuery::new("2569", TF);
    q.search_term = "2".into();
    let ids: Vec<&str> = view(&data, &q).iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "7.1"]);
}

#[test]
fn score_sort_puts_missing_scores_after_present_ones() {
    let data = vec![
        indicator("none", OrderKey::Number(1.0), "a", "2569", Some((None, Status::Pending))),
        indicator("low", OrderKey::Number(2.0), "b", "2569", Some((Some(0.0), Status::Failed))),
        indicator("absent", OrderKey::Number(3.0), "c", "2569", None),
        indicator("high", OrderKey::Number(4.0), "d", "2569", Some((Some(4.5), Status::Passed))),
    ];
    let mut q = ViewQuery::new("2569", TF);
    q.sort_key = SortKey::Score;
    let ids: Vec<&str> = view(&data, &q).iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["high", "low", "none", "absent"]);
}

#[test]
fn edit_save_and_reload_round_trip() {
    let dir = tempdir().unwrap();
    let mut store = JsonFileStore::new(dir.path().join("indicators.json"));
    let mut notifier = RecordingNotifier::default();
    let mut session = Session::new("2569", TF);

    let report = session.load(&mut store, &mut notifier, "2569");
    assert_eq!(report.source, LoadSource::Seeded);
    assert_eq!(session.executive().critical_indicators.len(), 1);

    // Indicator 5 fails at the provincial level; raise its score.
    let record = session.find("5").cloned().unwrap();
    let edited = apply_edit(&record, TF, PROVINCIAL_AREA, EditField::Score, "4").unwrap();
    session.save_edit(&mut store, &mut notifier, edited).unwrap();
    assert_eq!(
        notifier.kinds(),
        vec![NotifyKind::Info, NotifyKind::Success]
    );
    assert!(session.executive().critical_indicators.is_empty());

    let mut fresh = Session::new("2569", TF);
    fresh.load(&mut store, &mut notifier, "2569");
    let reloaded = fresh.find("5").unwrap();
    assert_eq!(reloaded.status_at(TF, PROVINCIAL_AREA), Status::Passed);
    assert_eq!(reloaded.score_at(TF, PROVINCIAL_AREA), Some(4.0));
    assert_eq!(reloaded.results, session.find("5").unwrap().results);
}

struct RejectingStore;

impl IndicatorStore for RejectingStore {
    fn list(&self, _fiscal_year: &str) -> Result<Vec<StoredIndicator>, StoreError> {
        Ok(Vec::new())
    }

    fn insert(&mut self, _rows: &[StoredIndicator]) -> Result<(), StoreError> {
        Ok(())
    }

    fn update(&mut self, _id: &str, _patch: &StoredIndicator) -> Result<(), StoreError> {
        Err(StoreError::Rejected("network down".into()))
    }
}

#[test]
fn failed_save_leaves_collection_unchanged() {
    let mut store = RejectingStore;
    let mut notifier = RecordingNotifier::default();
    let mut session = Session::new("2569", TF);
    session.load(&mut store, &mut notifier, "2569");
    let before = session.records().to_vec();

    let record = session.find("1").cloned().unwrap();
    let edited = apply_edit(&record, TF, PROVINCIAL_AREA, EditField::Score, "1").unwrap();
    let result = session.save_edit(&mut store, &mut notifier, edited);

    assert!(matches!(result, Err(StoreError::Rejected(_))));
    assert_eq!(session.records(), before.as_slice());
    assert_eq!(notifier.kinds().last(), Some(&NotifyKind::Error));
}

#[test]
fn add_indicator_is_a_placeholder() {
    let session = Session::new("2569", TF);
    let mut notifier = RecordingNotifier::default();
    session.add_indicator(&mut notifier);
    assert_eq!(notifier.messages.len(), 1);
    assert_eq!(notifier.messages[0].0, NotifyKind::Info);
    assert!(session.records().is_empty());
}
