pub mod academic_group;
pub mod import;
pub mod schedule;
pub mod venue;

pub use academic_group::{AcademicGroup, NewAcademicGroupRequest};
pub use import::{BulkCreateResult, BulkItemError, CsvImportResult, CsvRowError, RowErrorKind};
pub use schedule::{
    ConflictAxis, NewScheduleRequest, Schedule, ScheduleFilter, ScheduleRow, ScheduleStatus,
    TimeSlot, UpdateScheduleRequest,
};
pub use venue::{NewVenueRequest, Venue};
