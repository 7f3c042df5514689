//! CSV schedule import.
//!
//! The header must name all of [`CSV_COLUMNS`] (any order, case and
//! surrounding whitespace ignored). Each data row then goes through the same
//! creation path as a single JSON request.

use std::collections::HashMap;
use std::io::Read;

use csv::{ErrorKind, ReaderBuilder, StringRecord};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{CsvImportResult, CsvRowError, NewScheduleRequest, RowErrorKind};
use crate::services::schedule_service::ScheduleCreator;

pub const CSV_COLUMNS: [&str; 10] = [
    "academic_group_id",
    "instructor_id",
    "venue_id",
    "subject",
    "day_of_week",
    "start_time",
    "end_time",
    "block",
    "start_date",
    "end_date",
];

/// Position of each expected column in the file's header.
/// Columns not in [`CSV_COLUMNS`] are allowed and ignored.
struct ColumnMap {
    index: HashMap<&'static str, usize>,
    width: usize,
}

impl ColumnMap {
    fn from_header(header: &StringRecord) -> Result<Self, AppError> {
        let normalized: Vec<String> = header
            .iter()
            .map(|name| name.trim().to_lowercase())
            .collect();

        let mut index = HashMap::new();
        let mut missing = Vec::new();
        for column in CSV_COLUMNS {
            match normalized.iter().position(|name| name == column) {
                Some(i) => {
                    index.insert(column, i);
                }
                None => missing.push(column),
            }
        }

        if !missing.is_empty() {
            return Err(AppError::InvalidCsv(format!(
                "header is missing required columns: {}",
                missing.join(", ")
            )));
        }
        Ok(Self {
            index,
            width: header.len(),
        })
    }

    fn get<'r>(&self, record: &'r StringRecord, column: &'static str) -> &'r str {
        self.index
            .get(column)
            .and_then(|&i| record.get(i))
            .unwrap_or("")
            .trim()
    }
}

struct RowError {
    message: String,
    detail: String,
}

fn parse_row(columns: &ColumnMap, record: &StringRecord) -> Result<NewScheduleRequest, RowError> {
    if record.len() != columns.width {
        return Err(RowError {
            message: format!(
                "expected {} columns, found {}",
                columns.width,
                record.len()
            ),
            detail: record.iter().collect::<Vec<_>>().join(","),
        });
    }

    let uuid = |column: &'static str| {
        let raw = columns.get(record, column);
        Uuid::parse_str(raw).map_err(|e| RowError {
            message: format!("invalid {column}"),
            detail: format!("{raw:?}: {e}"),
        })
    };
    let academic_group_id = uuid("academic_group_id")?;
    let instructor_id = uuid("instructor_id")?;
    let venue_id = uuid("venue_id")?;

    let raw_day = columns.get(record, "day_of_week");
    let day_of_week = raw_day
        .parse::<i64>()
        .ok()
        .filter(|day| (1..=7).contains(day))
        .ok_or_else(|| RowError {
            message: "day_of_week must be an integer from 1 to 7".to_string(),
            detail: format!("{raw_day:?}"),
        })?;

    Ok(NewScheduleRequest {
        academic_group_id,
        instructor_id,
        venue_id,
        subject: columns.get(record, "subject").to_string(),
        block: columns.get(record, "block").to_string(),
        day_of_week,
        start_time: columns.get(record, "start_time").to_string(),
        end_time: columns.get(record, "end_time").to_string(),
        start_date: columns.get(record, "start_date").to_string(),
        end_date: columns.get(record, "end_date").to_string(),
    })
}

/// Imports every row of `input`.
///
/// Only a bad header fails the whole call; every row-level problem is
/// reported in the result.
pub async fn import_csv<R: Read + Send>(
    creator: &dyn ScheduleCreator,
    input: R,
) -> Result<CsvImportResult, AppError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let header = reader
        .headers()
        .map_err(|e| AppError::InvalidCsv(format!("cannot read header: {e}")))?
        .clone();
    let columns = ColumnMap::from_header(&header)?;

    let mut result = CsvImportResult::default();

    for (index, record) in reader.records().enumerate() {
        result.total_rows += 1;
        // header is line 1
        let fallback_row = index + 2;

        let record = match record {
            Ok(record) => record,
            Err(e) => {
                let row = e.position().map_or(fallback_row, |p| p.line() as usize);
                warn!("CSV row {} could not be read: {}", row, e);
                result.error_rows += 1;
                let fatal = matches!(e.kind(), ErrorKind::Io(_));
                result.errors.push(CsvRowError {
                    row,
                    kind: RowErrorKind::Read,
                    message: "row could not be read".to_string(),
                    detail: e.to_string(),
                });
                if fatal {
                    break;
                }
                continue;
            }
        };
        result.processed_rows += 1;
        let row = record.position().map_or(fallback_row, |p| p.line() as usize);

        let req = match parse_row(&columns, &record) {
            Ok(req) => req,
            Err(e) => {
                warn!("CSV row {} rejected: {}", row, e.message);
                result.error_rows += 1;
                result.errors.push(CsvRowError {
                    row,
                    kind: RowErrorKind::Parse,
                    message: e.message,
                    detail: e.detail,
                });
                continue;
            }
        };

        match creator.create_schedule(req).await {
            Ok(schedule) => {
                result.success_rows += 1;
                result.created.push(schedule);
            }
            Err(e) => {
                warn!("CSV row {} rejected: {}", row, e);
                result.error_rows += 1;
                result.errors.push(CsvRowError {
                    row,
                    kind: RowErrorKind::Business,
                    message: e.public_message(),
                    detail: e.report_detail(),
                });
            }
        }
    }

    result.finish();
    info!(
        "CSV import finished - processed: {}, succeeded: {}, errors: {}, success rate: {:.1}%",
        result.processed_rows, result.success_rows, result.error_rows, result.success_rate
    );
    Ok(result)
}
