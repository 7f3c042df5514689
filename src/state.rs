use std::sync::Arc;

use sqlx::SqlitePool;

use crate::db::repository::{
    AcademicGroupRepository, SqliteAcademicGroupRepository, SqliteScheduleRepository,
    SqliteVenueRepository, VenueRepository,
};
use crate::services::ScheduleService;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub groups: Arc<dyn AcademicGroupRepository>,
    pub venues: Arc<dyn VenueRepository>,
    pub schedules: ScheduleService,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        let groups: Arc<dyn AcademicGroupRepository> =
            Arc::new(SqliteAcademicGroupRepository::new(db.clone()));
        let venues: Arc<dyn VenueRepository> = Arc::new(SqliteVenueRepository::new(db.clone()));
        let schedules = ScheduleService::new(
            Arc::new(SqliteScheduleRepository::new(db.clone())),
            groups.clone(),
            venues.clone(),
        );

        Self {
            db,
            groups,
            venues,
            schedules,
        }
    }
}
