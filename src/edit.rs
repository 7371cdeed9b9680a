// Single-cell edits of an indicator's result matrix.
//
// `apply_edit` is pure: it returns a new record and never touches the one it
// was given. Persisting the result and swapping it into the collection is the
// session's job.
use crate::catalog::{is_known_area, is_known_timeframe};
use crate::error::EditError;
use crate::evaluate::derive_status;
use crate::types::{IndicatorRecord, ResultCell, Status};
use crate::util::parse_f64_safe;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Target,
    ResultCount,
    ResultPercentage,
    Score,
    Status,
}

impl EditField {
    pub const ALL: [EditField; 5] = [
        EditField::Target,
        EditField::ResultCount,
        EditField::ResultPercentage,
        EditField::Score,
        EditField::Status,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EditField::Target => "target",
            EditField::ResultCount => "result_count",
            EditField::ResultPercentage => "result_percentage",
            EditField::Score => "score",
            EditField::Status => "status",
        }
    }

    /// Form label shown when prompting for the field.
    pub fn label(&self) -> &'static str {
        match self {
            EditField::Target => "เป้าหมาย (Target)",
            EditField::ResultCount => "ผลงาน (Result)",
            EditField::ResultPercentage => "ร้อยละ (Percentage)",
            EditField::Score => "คะแนน (Score)",
            EditField::Status => "สถานะ (Status)",
        }
    }
}

// Blank clears the value; anything else must be a finite number.
fn parse_numeric(field: EditField, raw: &str) -> Result<Option<f64>, EditError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_f64_safe(Some(raw))
        .map(Some)
        .ok_or_else(|| EditError::InvalidValue {
            field: field.name(),
            raw: raw.to_string(),
        })
}

/// Apply one field edit to the cell at `(timeframe, area)`, creating the cell
/// (and its timeframe map) on first write.
///
/// A present score overwrites the status through [`derive_status`]; a
/// cleared score leaves the status as it was.
pub fn apply_edit(
    record: &IndicatorRecord,
    timeframe: &str,
    area: &str,
    field: EditField,
    raw_value: &str,
) -> Result<IndicatorRecord, EditError> {
    if !is_known_timeframe(timeframe) {
        return Err(EditError::UnknownTimeframe(timeframe.to_string()));
    }
    if !is_known_area(area) {
        return Err(EditError::UnknownArea(area.to_string()));
    }

    let mut cell = record
        .results
        .get(timeframe)
        .and_then(|areas| areas.get(area))
        .cloned()
        .unwrap_or_else(|| ResultCell::empty(area));

    match field {
        EditField::Target => cell.target = parse_numeric(field, raw_value)?,
        EditField::ResultCount => cell.result_count = parse_numeric(field, raw_value)?,
        EditField::ResultPercentage => cell.result_percentage = parse_numeric(field, raw_value)?,
        EditField::Score => {
            cell.score = parse_numeric(field, raw_value)?;
            if cell.score.is_some() {
                cell.status = derive_status(cell.score);
            }
        }
        EditField::Status => {
            cell.status = Status::parse(raw_value).ok_or_else(|| EditError::InvalidValue {
                field: field.name(),
                raw: raw_value.to_string(),
            })?;
        }
    }

    let mut updated = record.clone();
    updated
        .results
        .entry(timeframe.to_string())
        .or_default()
        .insert(area.to_string(), cell);
    Ok(updated)
}
