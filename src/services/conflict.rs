use uuid::Uuid;
use tracing::debug;

use crate::db::repository::ScheduleRepository;
use crate::error::AppError;
use crate::models::{ConflictAxis, TimeSlot};

/// The resources a candidate holds, in the order they are checked.
pub fn axes_for(instructor_id: Uuid, venue_id: Uuid, group_id: Uuid) -> [(ConflictAxis, Uuid); 3] {
    [
        (ConflictAxis::Instructor, instructor_id),
        (ConflictAxis::Venue, venue_id),
        (ConflictAxis::Group, group_id),
    ]
}

/// 講師・教室・クラスの重複チェック
pub struct ConflictChecker<'a> {
    schedules: &'a dyn ScheduleRepository,
}

impl<'a> ConflictChecker<'a> {
    pub fn new(schedules: &'a dyn ScheduleRepository) -> Self {
        Self { schedules }
    }

    /// Fails with the first axis that is already booked; later axes are not queried.
    pub async fn ensure_free(
        &self,
        axes: &[(ConflictAxis, Uuid)],
        slot: &TimeSlot,
        exclude_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        for &(axis, resource_id) in axes {
            if self
                .schedules
                .check_conflict(axis, resource_id, slot, exclude_id)
                .await?
            {
                debug!(%axis, %resource_id, day = slot.day_of_week, "schedule conflict");
                return Err(AppError::Conflict(axis));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    use crate::services::test_support::Fixture;

    fn slot() -> TimeSlot {
        TimeSlot {
            day_of_week: 4,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 6, 26).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_free_slot_checks_all_three_axes_in_order() {
        let fx = Fixture::new().await;
        let checker = ConflictChecker::new(&*fx.schedules);

        checker
            .ensure_free(&axes_for(fx.instructor_id, fx.venue_id, fx.group_id), &slot(), None)
            .await
            .expect("empty timetable has no conflicts");

        assert_eq!(
            fx.schedules.checked_axes(),
            vec![ConflictAxis::Instructor, ConflictAxis::Venue, ConflictAxis::Group]
        );
    }

    #[tokio::test]
    async fn test_venue_conflict_skips_group_check() {
        let fx = Fixture::new().await;
        fx.service.create(fx.request(4, "09:00", "10:00")).await.unwrap();
        fx.schedules.reset();

        let checker = ConflictChecker::new(&*fx.schedules);
        let err = checker
            .ensure_free(&axes_for(Uuid::new_v4(), fx.venue_id, fx.group_id), &slot(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(ConflictAxis::Venue)));
        assert_eq!(
            fx.schedules.checked_axes(),
            vec![ConflictAxis::Instructor, ConflictAxis::Venue]
        );
    }
}
