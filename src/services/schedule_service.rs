use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::db::repository::{AcademicGroupRepository, ScheduleRepository, VenueRepository};
use crate::error::AppError;
use crate::models::schedule::{DATE_FORMAT, TIME_FORMAT};
use crate::models::{
    NewScheduleRequest, Schedule, ScheduleFilter, ScheduleStatus, TimeSlot,
    UpdateScheduleRequest,
};
use crate::services::conflict::{ConflictChecker, axes_for};

/// Applies one candidate schedule. Both batch drivers go through this so a
/// JSON item and a CSV row are validated the same way.
#[async_trait]
pub trait ScheduleCreator: Send + Sync {
    async fn create_schedule(&self, req: NewScheduleRequest) -> Result<Schedule, AppError>;
}

#[derive(Clone)]
pub struct ScheduleService {
    schedules: Arc<dyn ScheduleRepository>,
    groups: Arc<dyn AcademicGroupRepository>,
    venues: Arc<dyn VenueRepository>,
}

impl ScheduleService {
    pub fn new(
        schedules: Arc<dyn ScheduleRepository>,
        groups: Arc<dyn AcademicGroupRepository>,
        venues: Arc<dyn VenueRepository>,
    ) -> Self {
        Self {
            schedules,
            groups,
            venues,
        }
    }

    pub async fn create(&self, req: NewScheduleRequest) -> Result<Schedule, AppError> {
        let slot = self.validate(&req).await?;
        ConflictChecker::new(&*self.schedules)
            .ensure_free(
                &axes_for(req.instructor_id, req.venue_id, req.academic_group_id),
                &slot,
                None,
            )
            .await?;

        let now = Utc::now().to_rfc3339();
        let schedule = Schedule {
            id: Uuid::new_v4(),
            academic_group_id: req.academic_group_id,
            instructor_id: req.instructor_id,
            venue_id: req.venue_id,
            subject: req.subject,
            block: req.block,
            day_of_week: slot.day_of_week,
            start_time: slot.start_time,
            end_time: slot.end_time,
            start_date: slot.start_date,
            end_date: slot.end_date,
            status: ScheduleStatus::Active,
            is_active: true,
            created_at: now.clone(),
            updated_at: now,
        };
        self.schedules.create(&schedule).await?;

        info!(id = %schedule.id, subject = %schedule.subject, "schedule created");
        Ok(schedule)
    }

    pub async fn update(&self, id: Uuid, req: UpdateScheduleRequest) -> Result<Schedule, AppError> {
        let current = self
            .schedules
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("schedule {id}")))?;

        let slot = self.validate(&req).await?;
        ConflictChecker::new(&*self.schedules)
            .ensure_free(
                &axes_for(req.instructor_id, req.venue_id, req.academic_group_id),
                &slot,
                Some(id),
            )
            .await?;

        let updated = Schedule {
            academic_group_id: req.academic_group_id,
            instructor_id: req.instructor_id,
            venue_id: req.venue_id,
            subject: req.subject,
            block: req.block,
            day_of_week: slot.day_of_week,
            start_time: slot.start_time,
            end_time: slot.end_time,
            start_date: slot.start_date,
            end_date: slot.end_date,
            updated_at: Utc::now().to_rfc3339(),
            ..current
        };

        if !self.schedules.update(&updated).await? {
            return Err(AppError::NotFound(format!("schedule {id}")));
        }

        info!(id = %updated.id, "schedule updated");
        Ok(updated)
    }

    pub async fn get(&self, id: Uuid) -> Result<Schedule, AppError> {
        self.schedules
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("schedule {id}")))
    }

    pub async fn list(&self, filter: &ScheduleFilter) -> Result<Vec<Schedule>, AppError> {
        self.schedules.list(filter).await
    }

    /// References, formats and invariants, in that order. Nothing here
    /// touches the conflict queries.
    async fn validate(&self, req: &NewScheduleRequest) -> Result<TimeSlot, AppError> {
        // instructor ids are taken as given, there is no instructor registry to check against
        if self.groups.get_by_id(req.academic_group_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "academic group {}",
                req.academic_group_id
            )));
        }
        if self.venues.get_by_id(req.venue_id).await?.is_none() {
            return Err(AppError::NotFound(format!("venue {}", req.venue_id)));
        }

        let start_time = parse_time("start_time", &req.start_time)?;
        let end_time = parse_time("end_time", &req.end_time)?;
        let start_date = parse_date("start_date", &req.start_date)?;
        let end_date = parse_date("end_date", &req.end_date)?;

        if end_time <= start_time {
            return Err(AppError::Validation(
                "end_time must be after start_time".to_string(),
            ));
        }
        if end_date < start_date {
            return Err(AppError::Validation(
                "end_date must be on or after start_date".to_string(),
            ));
        }
        let day_of_week = u8::try_from(req.day_of_week)
            .ok()
            .filter(|day| (1..=7).contains(day))
            .ok_or_else(|| {
                AppError::Validation("day_of_week must be between 1 and 7".to_string())
            })?;

        Ok(TimeSlot {
            day_of_week,
            start_time,
            end_time,
            start_date,
            end_date,
        })
    }
}

#[async_trait]
impl ScheduleCreator for ScheduleService {
    async fn create_schedule(&self, req: NewScheduleRequest) -> Result<Schedule, AppError> {
        self.create(req).await
    }
}

pub fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|_| AppError::invalid_format(field, value))
}

pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| AppError::invalid_format(field, value))
}
