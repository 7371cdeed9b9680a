use crate::error::StoreError;
use crate::types::StoredIndicator;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The `indicators` table as the dashboard sees it.
pub trait IndicatorStore {
    /// Rows of one fiscal year, ordered by `order_num` ascending.
    fn list(&self, fiscal_year: &str) -> Result<Vec<StoredIndicator>, StoreError>;

    /// Bulk insert, used to seed an empty fiscal year.
    fn insert(&mut self, rows: &[StoredIndicator]) -> Result<(), StoreError>;

    /// Upsert keyed by `id`.
    fn update(&mut self, id: &str, patch: &StoredIndicator) -> Result<(), StoreError>;
}

/// Whole table kept in a single JSON array on disk. A missing file is an
/// empty table.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<StoredIndicator>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = std::fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn write_all(&self, rows: &[StoredIndicator]) -> Result<(), StoreError> {
        let s = serde_json::to_string_pretty(rows)?;
        std::fs::write(&self.path, s)?;
        Ok(())
    }
}

impl IndicatorStore for JsonFileStore {
    fn list(&self, fiscal_year: &str) -> Result<Vec<StoredIndicator>, StoreError> {
        let mut rows: Vec<StoredIndicator> = self
            .read_all()?
            .into_iter()
            .filter(|r| r.fiscal_year == fiscal_year)
            .collect();
        rows.sort_by(|a, b| a.order_num.cmp(&b.order_num));
        debug!(path = %self.path.display(), fiscal_year, rows = rows.len(), "listed indicators");
        Ok(rows)
    }

    fn insert(&mut self, rows: &[StoredIndicator]) -> Result<(), StoreError> {
        let mut all = self.read_all()?;
        if let Some(dup) = rows.iter().find(|r| all.iter().any(|e| e.id == r.id)) {
            return Err(StoreError::Rejected(format!("duplicate id {}", dup.id)));
        }
        let now = Utc::now();
        all.extend(rows.iter().cloned().map(|mut r| {
            r.created_at.get_or_insert(now);
            r
        }));
        self.write_all(&all)?;
        info!(path = %self.path.display(), rows = rows.len(), "inserted indicators");
        Ok(())
    }

    fn update(&mut self, id: &str, patch: &StoredIndicator) -> Result<(), StoreError> {
        if patch.id != id {
            return Err(StoreError::Rejected(format!(
                "row id {} does not match {}",
                patch.id, id
            )));
        }
        let mut all = self.read_all()?;
        match all.iter_mut().find(|r| r.id == id) {
            Some(existing) => {
                let created_at = existing.created_at;
                *existing = patch.clone();
                existing.created_at = patch.created_at.or(created_at);
            }
            None => {
                let mut row = patch.clone();
                row.created_at.get_or_insert(Utc::now());
                all.push(row);
            }
        }
        self.write_all(&all)?;
        info!(path = %self.path.display(), id, "updated indicator");
        Ok(())
    }
}
