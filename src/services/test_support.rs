use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::repository::{
    AcademicGroupRepository, ScheduleRepository, SqliteAcademicGroupRepository,
    SqliteScheduleRepository, SqliteVenueRepository, VenueRepository,
};
use crate::db::test_pool;
use crate::error::AppError;
use crate::models::{
    ConflictAxis, NewAcademicGroupRequest, NewScheduleRequest, NewVenueRequest, Schedule,
    ScheduleFilter, TimeSlot,
};
use crate::services::ScheduleService;

/// SQLite repository that records every conflict query it answers.
pub struct RecordingScheduleRepository {
    inner: SqliteScheduleRepository,
    checked: Mutex<Vec<ConflictAxis>>,
}

impl RecordingScheduleRepository {
    pub fn checked_axes(&self) -> Vec<ConflictAxis> {
        self.checked.lock().unwrap().clone()
    }

    pub fn reset(&self) {
        self.checked.lock().unwrap().clear();
    }
}

#[async_trait]
impl ScheduleRepository for RecordingScheduleRepository {
    async fn create(&self, schedule: &Schedule) -> Result<(), AppError> {
        self.inner.create(schedule).await
    }

    async fn update(&self, schedule: &Schedule) -> Result<bool, AppError> {
        self.inner.update(schedule).await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Schedule>, AppError> {
        self.inner.get_by_id(id).await
    }

    async fn list(&self, filter: &ScheduleFilter) -> Result<Vec<Schedule>, AppError> {
        self.inner.list(filter).await
    }

    async fn check_conflict(
        &self,
        axis: ConflictAxis,
        resource_id: Uuid,
        slot: &TimeSlot,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        self.checked.lock().unwrap().push(axis);
        self.inner
            .check_conflict(axis, resource_id, slot, exclude_id)
            .await
    }
}

pub struct Fixture {
    pub pool: SqlitePool,
    pub service: ScheduleService,
    pub schedules: Arc<RecordingScheduleRepository>,
    groups: Arc<SqliteAcademicGroupRepository>,
    venues: Arc<SqliteVenueRepository>,
    pub group_id: Uuid,
    pub venue_id: Uuid,
    pub instructor_id: Uuid,
}

impl Fixture {
    pub async fn new() -> Self {
        let pool = test_pool().await;
        let schedules = Arc::new(RecordingScheduleRepository {
            inner: SqliteScheduleRepository::new(pool.clone()),
            checked: Mutex::new(Vec::new()),
        });
        let groups = Arc::new(SqliteAcademicGroupRepository::new(pool.clone()));
        let venues = Arc::new(SqliteVenueRepository::new(pool.clone()));
        let service = ScheduleService::new(schedules.clone(), groups.clone(), venues.clone());

        let mut fx = Self {
            pool,
            service,
            schedules,
            groups,
            venues,
            group_id: Uuid::nil(),
            venue_id: Uuid::nil(),
            instructor_id: Uuid::new_v4(),
        };
        fx.group_id = fx.new_group("1A").await;
        fx.venue_id = fx.new_venue("Room 101").await;
        fx
    }

    pub async fn new_group(&self, name: &str) -> Uuid {
        let group = self
            .groups
            .create(NewAcademicGroupRequest { name: name.to_string() })
            .await
            .expect("Failed to insert group");
        Uuid::parse_str(&group.id).unwrap()
    }

    pub async fn new_venue(&self, name: &str) -> Uuid {
        let venue = self
            .venues
            .create(NewVenueRequest { name: name.to_string(), capacity: None })
            .await
            .expect("Failed to insert venue");
        Uuid::parse_str(&venue.id).unwrap()
    }

    /// Spring term candidate for the fixture's instructor, venue and group.
    pub fn request(&self, day_of_week: i64, start: &str, end: &str) -> NewScheduleRequest {
        NewScheduleRequest {
            academic_group_id: self.group_id,
            instructor_id: self.instructor_id,
            venue_id: self.venue_id,
            subject: "Algebra".to_string(),
            block: "B1".to_string(),
            day_of_week,
            start_time: start.to_string(),
            end_time: end.to_string(),
            start_date: "2026-03-02".to_string(),
            end_date: "2026-06-26".to_string(),
        }
    }
}
