use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const TIME_FORMAT: &str = "%H:%M";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleStatus {
    Active,
    Cancelled,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStatus::Active => "ACTIVE",
            ScheduleStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Some(ScheduleStatus::Active),
            "CANCELLED" => Some(ScheduleStatus::Cancelled),
            _ => None,
        }
    }
}

/// A resource that can be double-booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictAxis {
    Instructor,
    Venue,
    Group,
}

impl ConflictAxis {
    /// Column of `schedules` holding the resource id for this axis.
    pub fn column(&self) -> &'static str {
        match self {
            ConflictAxis::Instructor => "instructor_id",
            ConflictAxis::Venue => "venue_id",
            ConflictAxis::Group => "academic_group_id",
        }
    }

    pub fn conflict_message(&self) -> &'static str {
        match self {
            ConflictAxis::Instructor => "the instructor already has a schedule at this time",
            ConflictAxis::Venue => "the venue is already occupied at this time",
            ConflictAxis::Group => "the group already has a schedule at this time",
        }
    }
}

impl fmt::Display for ConflictAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConflictAxis::Instructor => "instructor",
            ConflictAxis::Venue => "venue",
            ConflictAxis::Group => "group",
        };
        f.write_str(name)
    }
}

/// Day-of-week, time range and date range of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub day_of_week: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub academic_group_id: Uuid,
    pub instructor_id: Uuid,
    pub venue_id: Uuid,
    pub subject: String,
    pub block: String,
    pub day_of_week: u8,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ScheduleStatus,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Schedule {
    pub fn slot(&self) -> TimeSlot {
        TimeSlot {
            day_of_week: self.day_of_week,
            start_time: self.start_time,
            end_time: self.end_time,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Raw row as stored in SQLite. Ids, times and dates are kept as text.
#[derive(Debug, Clone, FromRow)]
pub struct ScheduleRow {
    pub id: String,
    pub academic_group_id: String,
    pub instructor_id: String,
    pub venue_id: String,
    pub subject: String,
    pub block: String,
    pub day_of_week: i64,
    pub start_time: String,
    pub end_time: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<ScheduleRow> for Schedule {
    type Error = sqlx::Error;

    fn try_from(row: ScheduleRow) -> Result<Self, Self::Error> {
        fn decode<T, E: std::error::Error + Send + Sync + 'static>(
            r: Result<T, E>,
        ) -> Result<T, sqlx::Error> {
            r.map_err(|e| sqlx::Error::Decode(Box::new(e)))
        }

        let status = ScheduleStatus::parse(&row.status).ok_or_else(|| {
            sqlx::Error::Decode(format!("unknown schedule status {:?}", row.status).into())
        })?;
        let day_of_week = u8::try_from(row.day_of_week)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Schedule {
            id: decode(Uuid::parse_str(&row.id))?,
            academic_group_id: decode(Uuid::parse_str(&row.academic_group_id))?,
            instructor_id: decode(Uuid::parse_str(&row.instructor_id))?,
            venue_id: decode(Uuid::parse_str(&row.venue_id))?,
            subject: row.subject,
            block: row.block,
            day_of_week,
            start_time: decode(NaiveTime::parse_from_str(&row.start_time, TIME_FORMAT))?,
            end_time: decode(NaiveTime::parse_from_str(&row.end_time, TIME_FORMAT))?,
            start_date: decode(NaiveDate::parse_from_str(&row.start_date, DATE_FORMAT))?,
            end_date: decode(NaiveDate::parse_from_str(&row.end_date, DATE_FORMAT))?,
            status,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Candidate schedule as it arrives from JSON or a CSV row.
///
/// Times and dates stay raw strings here; they are parsed by the use case so
/// that a malformed value is reported against the field it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewScheduleRequest {
    pub academic_group_id: Uuid,
    pub instructor_id: Uuid,
    pub venue_id: Uuid,
    pub subject: String,
    pub block: String,
    pub day_of_week: i64,
    pub start_time: String,
    pub end_time: String,
    pub start_date: String,
    pub end_date: String,
}

pub type UpdateScheduleRequest = NewScheduleRequest;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleFilter {
    pub academic_group_id: Option<Uuid>,
    pub instructor_id: Option<Uuid>,
    pub venue_id: Option<Uuid>,
    pub day_of_week: Option<u8>,
    pub status: Option<ScheduleStatus>,
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIME_FORMAT;

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format(TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(&raw, TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(ScheduleStatus::parse("active"), Some(ScheduleStatus::Active));
        assert_eq!(ScheduleStatus::parse(" CANCELLED "), Some(ScheduleStatus::Cancelled));
        assert_eq!(ScheduleStatus::parse("archived"), None);
    }

    #[test]
    fn conflict_axis_maps_to_its_column() {
        assert_eq!(ConflictAxis::Instructor.column(), "instructor_id");
        assert_eq!(ConflictAxis::Group.column(), "academic_group_id");
        assert_eq!(ConflictAxis::Venue.to_string(), "venue");
    }

    #[test]
    fn schedule_serializes_times_as_hhmm() {
        let schedule = Schedule {
            id: Uuid::new_v4(),
            academic_group_id: Uuid::new_v4(),
            instructor_id: Uuid::new_v4(),
            venue_id: Uuid::new_v4(),
            subject: "Calculus".to_string(),
            block: "B1".to_string(),
            day_of_week: 1,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            start_date: NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 6, 26).unwrap(),
            status: ScheduleStatus::Active,
            is_active: true,
            created_at: String::new(),
            updated_at: String::new(),
        };

        let json = serde_json::to_value(&schedule).unwrap();
        assert_eq!(json["start_time"], "09:00");
        assert_eq!(json["end_time"], "10:30");
        assert_eq!(json["start_date"], "2026-02-02");
        assert_eq!(json["status"], "ACTIVE");
    }
}
