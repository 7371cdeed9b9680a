use crate::catalog::{is_known_area, is_known_timeframe};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tabled::Tabled;

/// Evaluation outcome of one result cell. Serialized with the Thai labels the
/// dashboard has always stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Status {
    #[serde(rename = "ผ่าน")]
    Passed,
    #[serde(rename = "ไม่ผ่าน")]
    Failed,
    #[default]
    #[serde(rename = "รอประเมิน")]
    Pending,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Passed, Status::Failed, Status::Pending];

    pub fn label(&self) -> &'static str {
        match self {
            Status::Passed => "ผ่าน",
            Status::Failed => "ไม่ผ่าน",
            Status::Pending => "รอประเมิน",
        }
    }

    /// Accepts the stored Thai label or the English name, case-insensitively.
    pub fn parse(s: &str) -> Option<Status> {
        let s = s.trim();
        Status::ALL.into_iter().find(|st| {
            st.label() == s || format!("{:?}", st).eq_ignore_ascii_case(s)
        })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Legacy rows may carry labels we no longer recognise; read them as pending
// instead of failing the whole load.
impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(Status::parse).unwrap_or_default())
    }
}

/// One area's outcome for one indicator in one timeframe. Every field may be
/// missing in stored data; missing means "no data", never zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultCell {
    pub area_name: String,
    pub target: Option<f64>,
    pub result_count: Option<f64>,
    pub result_percentage: Option<f64>,
    pub score: Option<f64>,
    pub status: Status,
}

impl ResultCell {
    /// Fresh cell for lazy creation on first edit: all fields absent, pending.
    pub fn empty(area: &str) -> Self {
        ResultCell {
            area_name: area.to_string(),
            ..ResultCell::default()
        }
    }
}

/// Display ordering value. Seed data mixes numbers (`1`) with dotted
/// sub-indicator labels (`"7.1"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderKey {
    Number(f64),
    Text(String),
}

impl Default for OrderKey {
    fn default() -> Self {
        OrderKey::Text(String::new())
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Whole numbers print without a trailing ".0" so `1` searches as "1".
            OrderKey::Number(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{}", *n as i64),
            OrderKey::Number(n) => write!(f, "{}", n),
            OrderKey::Text(s) => f.write_str(s),
        }
    }
}

/// Rubric threshold for one score level: a raw value, or a placeholder such as "-".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriterionValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for CriterionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriterionValue::Number(n) => write!(f, "{}", n),
            CriterionValue::Text(s) => f.write_str(s),
        }
    }
}

/// Rubric level (1..=5) to threshold. Carried as metadata; nothing scores from it yet.
pub type ScoreCriteria = BTreeMap<u8, CriterionValue>;

/// timeframe -> area -> cell. Both levels are sparse.
pub type Results = BTreeMap<String, BTreeMap<String, ResultCell>>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorRecord {
    pub id: String,
    #[serde(default)]
    pub order: OrderKey,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub target_criteria: String,
    // weight, score_criteria and max_score are inert metadata today.
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub score_criteria: ScoreCriteria,
    #[serde(default)]
    pub max_score: f64,
    #[serde(default)]
    pub results: Results,
    #[serde(default)]
    pub responsible_group: String,
    #[serde(default)]
    pub fiscal_year: String,
}

impl IndicatorRecord {
    /// Cell at `(timeframe, area)`. Keys outside the fixed enumerations read as absent.
    pub fn cell(&self, timeframe: &str, area: &str) -> Option<&ResultCell> {
        if !is_known_timeframe(timeframe) || !is_known_area(area) {
            return None;
        }
        self.results.get(timeframe)?.get(area)
    }

    /// Status at `(timeframe, area)`, with a missing cell read as pending.
    pub fn status_at(&self, timeframe: &str, area: &str) -> Status {
        self.cell(timeframe, area).map(|c| c.status).unwrap_or_default()
    }

    pub fn score_at(&self, timeframe: &str, area: &str) -> Option<f64> {
        self.cell(timeframe, area).and_then(|c| c.score)
    }

    /// Rubric as one line, e.g. `1: 60 | 2: 65 | 3: -`. Empty when there is none.
    pub fn rubric_line(&self) -> String {
        self.score_criteria
            .iter()
            .map(|(level, threshold)| format!("{}: {}", level, threshold))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Number of timeframe or area keys that fall outside the enumerations.
    pub fn unknown_key_count(&self) -> usize {
        self.results
            .iter()
            .map(|(tf, areas)| {
                if !is_known_timeframe(tf) {
                    1
                } else {
                    areas.keys().filter(|a| !is_known_area(a)).count()
                }
            })
            .sum()
    }
}

/// Row shape of the `indicators` table. Identical to [`IndicatorRecord`]
/// except that `order` is persisted as the text column `order_num`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredIndicator {
    pub id: String,
    #[serde(default)]
    pub order_num: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub target_criteria: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub score_criteria: ScoreCriteria,
    #[serde(default)]
    pub max_score: f64,
    #[serde(default)]
    pub results: Results,
    #[serde(default)]
    pub responsible_group: String,
    #[serde(default)]
    pub fiscal_year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&IndicatorRecord> for StoredIndicator {
    fn from(r: &IndicatorRecord) -> Self {
        StoredIndicator {
            id: r.id.clone(),
            order_num: r.order.to_string(),
            name: r.name.clone(),
            target_criteria: r.target_criteria.clone(),
            weight: r.weight,
            score_criteria: r.score_criteria.clone(),
            max_score: r.max_score,
            results: r.results.clone(),
            responsible_group: r.responsible_group.clone(),
            fiscal_year: r.fiscal_year.clone(),
            created_at: None,
        }
    }
}

impl From<StoredIndicator> for IndicatorRecord {
    fn from(row: StoredIndicator) -> Self {
        IndicatorRecord {
            id: row.id,
            order: OrderKey::Text(row.order_num),
            name: row.name,
            target_criteria: row.target_criteria,
            weight: row.weight,
            score_criteria: row.score_criteria,
            max_score: row.max_score,
            results: row.results,
            responsible_group: row.responsible_group,
            fiscal_year: row.fiscal_year,
        }
    }
}

/// Counters plus per-area breakdowns for the dashboard page.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pending: usize,
    pub area_scores: Vec<AreaScore>,
    pub area_status: Vec<AreaStatusCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaScore {
    pub area: String,
    /// Mean of present scores, 2 decimals; 0 when the area has no scores.
    pub avg_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaStatusCount {
    pub area: String,
    pub passed: usize,
    pub failed: usize,
}

/// Provincial-level summary for the executive page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveSummary<'a> {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pending: usize,
    pub success_rate: u32,
    pub avg_score: String,
    #[serde(serialize_with = "serialize_critical")]
    pub critical_indicators: Vec<&'a IndicatorRecord>,
}

fn serialize_critical<S: serde::Serializer>(
    records: &[&IndicatorRecord],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct Critical<'r> {
        id: &'r str,
        order: String,
        name: &'r str,
        responsible_group: &'r str,
    }
    serializer.collect_seq(records.iter().map(|r| Critical {
        id: &r.id,
        order: r.order.to_string(),
        name: &r.name,
        responsible_group: &r.responsible_group,
    }))
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct IndicatorRow {
    #[serde(rename = "Order")]
    #[tabled(rename = "Order")]
    pub order: String,
    #[serde(rename = "Indicator")]
    #[tabled(rename = "Indicator")]
    pub name: String,
    #[serde(rename = "Target")]
    #[tabled(rename = "Target")]
    pub target: String,
    #[serde(rename = "Result")]
    #[tabled(rename = "Result")]
    pub result_count: String,
    #[serde(rename = "Percentage")]
    #[tabled(rename = "Percentage")]
    pub result_percentage: String,
    #[serde(rename = "Score")]
    #[tabled(rename = "Score")]
    pub score: String,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: String,
    #[serde(rename = "ResponsibleGroup")]
    #[tabled(rename = "ResponsibleGroup")]
    pub responsible_group: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct AreaScoreRow {
    #[serde(rename = "Area")]
    #[tabled(rename = "Area")]
    pub area: String,
    #[serde(rename = "AvgScore")]
    #[tabled(rename = "AvgScore")]
    pub avg_score: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct AreaStatusRow {
    #[serde(rename = "Area")]
    #[tabled(rename = "Area")]
    pub area: String,
    #[serde(rename = "Passed")]
    #[tabled(rename = "Passed")]
    pub passed: usize,
    #[serde(rename = "Failed")]
    #[tabled(rename = "Failed")]
    pub failed: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CriticalRow {
    #[serde(rename = "Order")]
    #[tabled(rename = "Order")]
    pub order: String,
    #[serde(rename = "Indicator")]
    #[tabled(rename = "Indicator")]
    pub name: String,
    #[serde(rename = "ResponsibleGroup")]
    #[tabled(rename = "ResponsibleGroup")]
    pub responsible_group: String,
    #[serde(rename = "Score")]
    #[tabled(rename = "Score")]
    pub score: String,
}
