use tracing::{info, warn};

use crate::models::{BulkCreateResult, BulkItemError, NewScheduleRequest};
use crate::services::schedule_service::ScheduleCreator;

/// Creates every candidate in order. A failing item is recorded and the
/// batch moves on; items already created stay created.
pub async fn create_bulk(
    creator: &dyn ScheduleCreator,
    items: Vec<NewScheduleRequest>,
) -> BulkCreateResult {
    let mut result = BulkCreateResult {
        total: items.len(),
        ..Default::default()
    };

    for (index, item) in items.into_iter().enumerate() {
        match creator.create_schedule(item).await {
            Ok(schedule) => {
                result.succeeded += 1;
                result.created.push(schedule);
            }
            Err(e) => {
                warn!("bulk item {} rejected: {}", index, e);
                result.errors += 1;
                result.failed.push(BulkItemError {
                    index,
                    error: e.public_message(),
                    detail: e.report_detail(),
                });
            }
        }
    }

    info!(
        "Bulk create finished - total: {}, succeeded: {}, errors: {}",
        result.total, result.succeeded, result.errors
    );
    result
}
