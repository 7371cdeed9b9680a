// Filter and sort pipeline behind the indicator table.
use crate::catalog::PROVINCIAL_AREA;
use crate::types::{IndicatorRecord, IndicatorRow, Status};
use crate::util::{cmp_f64, collate, format_optional, leading_number};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    /// "all" (or empty) means no filtering; otherwise a status label or name.
    pub fn parse(s: &str) -> Option<StatusFilter> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") || s == "ทั้งหมด" {
            return Some(StatusFilter::All);
        }
        Status::parse(s).map(StatusFilter::Only)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Ascending by the leading number of `order`.
    #[default]
    Order,
    /// Ascending, Thai dictionary order.
    Name,
    /// Descending by score at the selected area; missing scores last.
    Score,
}

impl SortKey {
    pub fn parse(s: &str) -> Option<SortKey> {
        match s.trim().to_ascii_lowercase().as_str() {
            "order" => Some(SortKey::Order),
            "name" => Some(SortKey::Name),
            "score" => Some(SortKey::Score),
            _ => None,
        }
    }
}

/// Everything the table view is parameterised by.
#[derive(Debug, Clone)]
pub struct ViewQuery {
    pub fiscal_year: String,
    pub timeframe: String,
    pub area: String,
    pub search_term: String,
    pub status_filter: StatusFilter,
    pub sort_key: SortKey,
}

impl ViewQuery {
    pub fn new(fiscal_year: &str, timeframe: &str) -> Self {
        ViewQuery {
            fiscal_year: fiscal_year.to_string(),
            timeframe: timeframe.to_string(),
            area: PROVINCIAL_AREA.to_string(),
            search_term: String::new(),
            status_filter: StatusFilter::All,
            sort_key: SortKey::Order,
        }
    }

    fn matches_search(&self, record: &IndicatorRecord) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let term = self.search_term.to_lowercase();
        record.name.to_lowercase().contains(&term) || record.order.to_string().contains(&self.search_term)
    }

    fn matches_status(&self, record: &IndicatorRecord) -> bool {
        match self.status_filter {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => record.status_at(&self.timeframe, &self.area) == wanted,
        }
    }
}

/// Ordered view of the records for the table: scope to the fiscal year,
/// search, filter by status at the selected area, then stable-sort.
pub fn view<'a>(records: &'a [IndicatorRecord], query: &ViewQuery) -> Vec<&'a IndicatorRecord> {
    let mut rows: Vec<&IndicatorRecord> = records
        .iter()
        .filter(|r| r.fiscal_year == query.fiscal_year)
        .filter(|r| query.matches_search(r))
        .filter(|r| query.matches_status(r))
        .collect();
    sort_records(&mut rows, query);
    rows
}

/// Stable sort in place; ties keep their incoming order.
pub fn sort_records(rows: &mut [&IndicatorRecord], query: &ViewQuery) {
    match query.sort_key {
        SortKey::Order => rows.sort_by(|a, b| {
            cmp_f64(
                leading_number(&a.order.to_string()),
                leading_number(&b.order.to_string()),
            )
        }),
        SortKey::Name => rows.sort_by(|a, b| collate(&a.name, &b.name)),
        SortKey::Score => {
            let score = |r: &IndicatorRecord| r.score_at(&query.timeframe, &query.area);
            // Missing scores rank after every present one, whatever its value.
            rows.sort_by(|a, b| match (score(a), score(b)) {
                (Some(x), Some(y)) => cmp_f64(y, x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
        }
    }
}

/// Table rows for the selected timeframe and area; missing values render as "-".
pub fn table_rows(rows: &[&IndicatorRecord], query: &ViewQuery) -> Vec<IndicatorRow> {
    rows.iter()
        .map(|r| {
            let cell = r.cell(&query.timeframe, &query.area);
            IndicatorRow {
                order: r.order.to_string(),
                name: r.name.clone(),
                target: format_optional(cell.and_then(|c| c.target)),
                result_count: format_optional(cell.and_then(|c| c.result_count)),
                result_percentage: format_optional(cell.and_then(|c| c.result_percentage)),
                score: format_optional(cell.and_then(|c| c.score)),
                status: cell.map(|c| c.status).unwrap_or_default().to_string(),
                responsible_group: r.responsible_group.clone(),
            }
        })
        .collect()
}
