pub mod bulk;
pub mod conflict;
pub mod csv_import;
pub mod overlap;
pub mod schedule_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use bulk::create_bulk;
pub use conflict::ConflictChecker;
pub use csv_import::{CSV_COLUMNS, import_csv};
pub use schedule_service::{ScheduleCreator, ScheduleService};
