// State owned by the top-level view: which year and timeframe are selected,
// and the records currently on screen.
//
// Records are treated as values. Loads replace the collection wholesale,
// saves swap one record by `id`; nothing edits a record in place.
use crate::catalog::is_known_timeframe;
use crate::error::{EditError, StoreError};
use crate::loader::{load_fiscal_year, LoadReport};
use crate::notify::{Notifier, NotifyKind, NotifyOptions};
use crate::reports::{aggregate_dashboard, aggregate_executive};
use crate::store::IndicatorStore;
use crate::types::{DashboardStats, ExecutiveSummary, IndicatorRecord, StoredIndicator};
use crate::view::{view, ViewQuery};
use tracing::{debug, info, warn};

/// Handle for one in-flight load. Only the most recently issued ticket may
/// apply its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    fiscal_year: String,
}

impl LoadTicket {
    pub fn fiscal_year(&self) -> &str {
        &self.fiscal_year
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    fiscal_year: String,
    timeframe: String,
    records: Vec<IndicatorRecord>,
    generation: u64,
}

impl Session {
    pub fn new(fiscal_year: &str, timeframe: &str) -> Self {
        Session {
            fiscal_year: fiscal_year.to_string(),
            timeframe: timeframe.to_string(),
            records: Vec::new(),
            generation: 0,
        }
    }

    pub fn fiscal_year(&self) -> &str {
        &self.fiscal_year
    }

    pub fn timeframe(&self) -> &str {
        &self.timeframe
    }

    pub fn records(&self) -> &[IndicatorRecord] {
        &self.records
    }

    pub fn find(&self, id: &str) -> Option<&IndicatorRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn set_timeframe(&mut self, timeframe: &str) -> Result<(), EditError> {
        if !is_known_timeframe(timeframe) {
            return Err(EditError::UnknownTimeframe(timeframe.to_string()));
        }
        self.timeframe = timeframe.to_string();
        Ok(())
    }

    /// Switch to `fiscal_year` and issue a ticket for its load. Any ticket
    /// issued earlier becomes stale.
    pub fn begin_load(&mut self, fiscal_year: &str) -> LoadTicket {
        self.generation += 1;
        self.fiscal_year = fiscal_year.to_string();
        LoadTicket {
            generation: self.generation,
            fiscal_year: fiscal_year.to_string(),
        }
    }

    /// Apply a finished load. Returns `false` and drops the records when a
    /// newer load has been started since the ticket was issued.
    pub fn finish_load(&mut self, ticket: LoadTicket, records: Vec<IndicatorRecord>) -> bool {
        if ticket.generation != self.generation || ticket.fiscal_year != self.fiscal_year {
            debug!(
                stale = ticket.fiscal_year.as_str(),
                current = self.fiscal_year.as_str(),
                "discarding superseded load"
            );
            return false;
        }
        self.records = records;
        true
    }

    /// Load `fiscal_year` from the store and make it current.
    pub fn load(
        &mut self,
        store: &mut dyn IndicatorStore,
        notifier: &mut dyn Notifier,
        fiscal_year: &str,
    ) -> LoadReport {
        let ticket = self.begin_load(fiscal_year);
        let (records, report) = load_fiscal_year(store, notifier, ticket.fiscal_year());
        self.finish_load(ticket, records);
        report
    }

    /// Persist an edited record, then swap it into the collection by `id`.
    ///
    /// On failure the collection is untouched and the error is returned so
    /// the caller can keep the edit open for another attempt.
    pub fn save_edit(
        &mut self,
        store: &mut dyn IndicatorStore,
        notifier: &mut dyn Notifier,
        edited: IndicatorRecord,
    ) -> Result<(), StoreError> {
        notifier.notify(
            NotifyKind::Info,
            "กำลังบันทึกข้อมูล...",
            &format!("ตัวชี้วัด {} (รอบ: {})", edited.order, self.timeframe),
            NotifyOptions::default(),
        );
        if let Err(e) = store.update(&edited.id, &StoredIndicator::from(&edited)) {
            warn!(id = %edited.id, "saving indicator failed: {}", e);
            notifier.notify(
                NotifyKind::Error,
                "บันทึกไม่สำเร็จ",
                &format!("เกิดข้อผิดพลาดในการบันทึกข้อมูล: {}", e),
                NotifyOptions::confirm(),
            );
            return Err(e);
        }

        match self.records.iter().position(|r| r.id == edited.id) {
            Some(i) => self.records[i] = edited.clone(),
            None => warn!(id = %edited.id, "saved indicator is not in the current collection"),
        }
        info!(id = %edited.id, timeframe = self.timeframe.as_str(), "indicator saved");
        notifier.notify(
            NotifyKind::Success,
            "บันทึกสำเร็จ!",
            &format!("ข้อมูลตัวชี้วัดถูกอัปเดตเรียบร้อยแล้ว (รอบ: {})", self.timeframe),
            NotifyOptions::timed(2000),
        );
        Ok(())
    }

    /// Adding indicators is not available yet; tell the user so.
    pub fn add_indicator(&self, notifier: &mut dyn Notifier) {
        notifier.notify(
            NotifyKind::Info,
            "เพิ่มตัวชี้วัดใหม่",
            "ฟังก์ชันนี้กำลังอยู่ระหว่างการพัฒนา",
            NotifyOptions::confirm(),
        );
    }

    pub fn executive(&self) -> ExecutiveSummary<'_> {
        aggregate_executive(&self.records, &self.fiscal_year, &self.timeframe)
    }

    pub fn dashboard(&self) -> DashboardStats {
        aggregate_dashboard(&self.records, &self.fiscal_year, &self.timeframe)
    }

    /// A table query preset to the current year and timeframe.
    pub fn query(&self) -> ViewQuery {
        ViewQuery::new(&self.fiscal_year, &self.timeframe)
    }

    pub fn view(&self, query: &ViewQuery) -> Vec<&IndicatorRecord> {
        view(&self.records, query)
    }
}
