//! Read-state transitions for activity records.

use sitework_core::{activity::Activity, store::ActivityStore};
use uuid::Uuid;

use crate::{ActivityLog, Error, Result};

/// Mark one activity read and return the updated record. Idempotent:
/// marking an already-read activity succeeds unchanged.
pub async fn mark_read<S: ActivityStore>(
  log: &ActivityLog<S>,
  activity_id: Uuid,
) -> Result<Activity> {
  log
    .store()
    .set_read(activity_id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| sitework_core::Error::ActivityNotFound(activity_id).into())
}

/// Mark every unread activity of a project read, atomically, and return
/// the affected records.
///
/// An empty unread set is an error, not an empty success, so callers can
/// distinguish "nothing to do" from "done".
pub async fn mark_all_read<S: ActivityStore>(
  log: &ActivityLog<S>,
  project_id: Uuid,
) -> Result<Vec<Activity>> {
  log
    .store()
    .get_project(project_id)
    .await
    .map_err(Error::store)?
    .ok_or(sitework_core::Error::ProjectNotFound(project_id))?;

  let affected = log
    .store()
    .mark_all_read(project_id)
    .await
    .map_err(Error::store)?;

  if affected.is_empty() {
    return Err(sitework_core::Error::NoUnreadActivities(project_id).into());
  }
  Ok(affected)
}
