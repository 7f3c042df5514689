use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    AcademicGroup, ConflictAxis, NewAcademicGroupRequest, NewVenueRequest, Schedule,
    ScheduleFilter, ScheduleRow, ScheduleStatus, TimeSlot, Venue,
};
use crate::models::schedule::{DATE_FORMAT, TIME_FORMAT};
use crate::services::overlap::slots_overlap;

const SCHEDULE_COLUMNS: &str = "id, academic_group_id, instructor_id, venue_id, subject, block, \
     day_of_week, start_time, end_time, start_date, end_date, status, is_active, created_at, updated_at";

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn create(&self, schedule: &Schedule) -> Result<(), AppError>;

    /// Returns `false` when no row with `schedule.id` exists.
    async fn update(&self, schedule: &Schedule) -> Result<bool, AppError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Schedule>, AppError>;

    async fn list(&self, filter: &ScheduleFilter) -> Result<Vec<Schedule>, AppError>;

    /// Whether another ACTIVE schedule holding `resource_id` on `axis` overlaps
    /// `slot` on the same day of week, in time and in date range.
    async fn check_conflict(
        &self,
        axis: ConflictAxis,
        resource_id: Uuid,
        slot: &TimeSlot,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError>;

    async fn check_instructor_conflict(
        &self,
        instructor_id: Uuid,
        slot: &TimeSlot,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        self.check_conflict(ConflictAxis::Instructor, instructor_id, slot, exclude_id)
            .await
    }

    async fn check_venue_conflict(
        &self,
        venue_id: Uuid,
        slot: &TimeSlot,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        self.check_conflict(ConflictAxis::Venue, venue_id, slot, exclude_id)
            .await
    }

    async fn check_group_conflict(
        &self,
        group_id: Uuid,
        slot: &TimeSlot,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        self.check_conflict(ConflictAxis::Group, group_id, slot, exclude_id)
            .await
    }
}

#[async_trait]
pub trait AcademicGroupRepository: Send + Sync {
    async fn create(&self, req: NewAcademicGroupRequest) -> Result<AcademicGroup, AppError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<AcademicGroup>, AppError>;
    async fn list(&self) -> Result<Vec<AcademicGroup>, AppError>;
}

#[async_trait]
pub trait VenueRepository: Send + Sync {
    async fn create(&self, req: NewVenueRequest) -> Result<Venue, AppError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Venue>, AppError>;
    async fn list(&self) -> Result<Vec<Venue>, AppError>;
}

#[derive(Clone)]
pub struct SqliteScheduleRepository {
    db: SqlitePool,
}

impl SqliteScheduleRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

fn time_text(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

fn date_text(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[async_trait]
impl ScheduleRepository for SqliteScheduleRepository {
    async fn create(&self, schedule: &Schedule) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO schedules
                (id, academic_group_id, instructor_id, venue_id, subject, block,
                day_of_week, start_time, end_time, start_date, end_date,
                status, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
        )
        .bind(schedule.id.to_string())
        .bind(schedule.academic_group_id.to_string())
        .bind(schedule.instructor_id.to_string())
        .bind(schedule.venue_id.to_string())
        .bind(&schedule.subject)
        .bind(&schedule.block)
        .bind(i64::from(schedule.day_of_week))
        .bind(time_text(schedule.start_time))
        .bind(time_text(schedule.end_time))
        .bind(date_text(schedule.start_date))
        .bind(date_text(schedule.end_date))
        .bind(schedule.status.as_str())
        .bind(schedule.is_active)
        .bind(&schedule.created_at)
        .bind(&schedule.updated_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn update(&self, schedule: &Schedule) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE schedules
            SET academic_group_id = ?1,
                instructor_id = ?2,
                venue_id = ?3,
                subject = ?4,
                block = ?5,
                day_of_week = ?6,
                start_time = ?7,
                end_time = ?8,
                start_date = ?9,
                end_date = ?10,
                status = ?11,
                is_active = ?12,
                updated_at = ?13
            WHERE id = ?14
            "#,
        )
        .bind(schedule.academic_group_id.to_string())
        .bind(schedule.instructor_id.to_string())
        .bind(schedule.venue_id.to_string())
        .bind(&schedule.subject)
        .bind(&schedule.block)
        .bind(i64::from(schedule.day_of_week))
        .bind(time_text(schedule.start_time))
        .bind(time_text(schedule.end_time))
        .bind(date_text(schedule.start_date))
        .bind(date_text(schedule.end_date))
        .bind(schedule.status.as_str())
        .bind(schedule.is_active)
        .bind(&schedule.updated_at)
        .bind(schedule.id.to_string())
        .execute(&self.db)
        .await?
        .rows_affected();

        Ok(result > 0)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Schedule>, AppError> {
        let row = sqlx::query_as::<_, ScheduleRow>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Schedule::try_from).transpose()?)
    }

    async fn list(&self, filter: &ScheduleFilter) -> Result<Vec<Schedule>, AppError> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE 1 = 1"));

        if let Some(group_id) = filter.academic_group_id {
            query.push(" AND academic_group_id = ").push_bind(group_id.to_string());
        }
        if let Some(instructor_id) = filter.instructor_id {
            query.push(" AND instructor_id = ").push_bind(instructor_id.to_string());
        }
        if let Some(venue_id) = filter.venue_id {
            query.push(" AND venue_id = ").push_bind(venue_id.to_string());
        }
        if let Some(day) = filter.day_of_week {
            query.push(" AND day_of_week = ").push_bind(i64::from(day));
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        query.push(" ORDER BY day_of_week, start_time, start_date");

        let rows = query
            .build_query_as::<ScheduleRow>()
            .fetch_all(&self.db)
            .await?;

        rows.into_iter()
            .map(|row| Schedule::try_from(row).map_err(AppError::from))
            .collect()
    }

    async fn check_conflict(
        &self,
        axis: ConflictAxis,
        resource_id: Uuid,
        slot: &TimeSlot,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let sql = format!(
            r#"
            SELECT start_time, end_time, start_date, end_date
            FROM schedules
            WHERE {column} = ?1
              AND day_of_week = ?2
              AND status = ?3
              AND is_active = 1
              AND (?4 IS NULL OR id != ?4)
            "#,
            column = axis.column(),
        );

        let rows = sqlx::query_as::<_, (String, String, String, String)>(&sql)
            .bind(resource_id.to_string())
            .bind(i64::from(slot.day_of_week))
            .bind(ScheduleStatus::Active.as_str())
            .bind(exclude_id.map(|id| id.to_string()))
            .fetch_all(&self.db)
            .await?;

        for (start_time, end_time, start_date, end_date) in rows {
            let existing = TimeSlot {
                day_of_week: slot.day_of_week,
                start_time: parse_stored(NaiveTime::parse_from_str(&start_time, TIME_FORMAT))?,
                end_time: parse_stored(NaiveTime::parse_from_str(&end_time, TIME_FORMAT))?,
                start_date: parse_stored(NaiveDate::parse_from_str(&start_date, DATE_FORMAT))?,
                end_date: parse_stored(NaiveDate::parse_from_str(&end_date, DATE_FORMAT))?,
            };
            if slots_overlap(slot, &existing) {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

fn parse_stored<T>(value: Result<T, chrono::ParseError>) -> Result<T, AppError> {
    value.map_err(|e| AppError::Database(sqlx::Error::Decode(Box::new(e))))
}

#[derive(Clone)]
pub struct SqliteAcademicGroupRepository {
    db: SqlitePool,
}

impl SqliteAcademicGroupRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AcademicGroupRepository for SqliteAcademicGroupRepository {
    async fn create(&self, req: NewAcademicGroupRequest) -> Result<AcademicGroup, AppError> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query("INSERT INTO academic_groups (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(&id)
            .bind(&req.name)
            .bind(&now)
            .execute(&self.db)
            .await?;

        Ok(AcademicGroup {
            id,
            name: req.name,
            created_at: now,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<AcademicGroup>, AppError> {
        let group = sqlx::query_as::<_, AcademicGroup>(
            "SELECT id, name, created_at FROM academic_groups WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.db)
        .await?;

        Ok(group)
    }

    async fn list(&self) -> Result<Vec<AcademicGroup>, AppError> {
        let groups = sqlx::query_as::<_, AcademicGroup>(
            "SELECT id, name, created_at FROM academic_groups ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(groups)
    }
}

#[derive(Clone)]
pub struct SqliteVenueRepository {
    db: SqlitePool,
}

impl SqliteVenueRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VenueRepository for SqliteVenueRepository {
    async fn create(&self, req: NewVenueRequest) -> Result<Venue, AppError> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query("INSERT INTO venues (id, name, capacity, created_at) VALUES (?1, ?2, ?3, ?4)")
            .bind(&id)
            .bind(&req.name)
            .bind(req.capacity)
            .bind(&now)
            .execute(&self.db)
            .await?;

        Ok(Venue {
            id,
            name: req.name,
            capacity: req.capacity,
            created_at: now,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Venue>, AppError> {
        let venue = sqlx::query_as::<_, Venue>(
            "SELECT id, name, capacity, created_at FROM venues WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.db)
        .await?;

        Ok(venue)
    }

    async fn list(&self) -> Result<Vec<Venue>, AppError> {
        let venues = sqlx::query_as::<_, Venue>(
            "SELECT id, name, capacity, created_at FROM venues ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(venues)
    }
}
