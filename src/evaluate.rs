use crate::types::{ResultCell, Status};

/// Lowest score that counts as a pass.
pub const PASS_THRESHOLD: f64 = 3.0;

/// Status implied by a score: no score is pending, `>= 3` passes, anything
/// lower fails.
pub fn derive_status(score: Option<f64>) -> Status {
    match score {
        None => Status::Pending,
        Some(s) if s >= PASS_THRESHOLD => Status::Passed,
        Some(_) => Status::Failed,
    }
}

/// Whether a stored status agrees with its score. Cells without a score are
/// always consistent; seed and legacy rows are allowed to disagree.
pub fn is_consistent(cell: &ResultCell) -> bool {
    cell.score.is_none() || derive_status(cell.score) == cell.status
}
