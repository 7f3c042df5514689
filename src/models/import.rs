use serde::Serialize;

use crate::models::Schedule;

/// Outcome of a bulk create call.
///
/// `succeeded + errors == total`, `created.len() == succeeded` and
/// `failed.len() == errors` always hold.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkCreateResult {
    pub total: usize,
    pub succeeded: usize,
    pub errors: usize,
    pub created: Vec<Schedule>,
    pub failed: Vec<BulkItemError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkItemError {
    /// 0-based position in the submitted list.
    pub index: usize,
    pub error: String,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowErrorKind {
    /// The line could not be decoded at all.
    Read,
    /// Wrong column count or an unparsable id / day-of-week.
    Parse,
    /// The row was well formed but rejected by the schedule rules.
    Business,
}

#[derive(Debug, Clone, Serialize)]
pub struct CsvRowError {
    /// 1-based line number in the file, header included.
    pub row: usize,
    pub kind: RowErrorKind,
    pub message: String,
    pub detail: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CsvImportResult {
    pub total_rows: usize,
    pub processed_rows: usize,
    pub success_rows: usize,
    pub error_rows: usize,
    pub success_rate: f64,
    pub created: Vec<Schedule>,
    pub errors: Vec<CsvRowError>,
}

impl CsvImportResult {
    pub(crate) fn finish(&mut self) {
        self.success_rate = if self.processed_rows == 0 {
            0.0
        } else {
            self.success_rows as f64 / self.processed_rows as f64 * 100.0
        };
    }
}
