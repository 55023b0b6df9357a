//! [`ActivityLog`] — the single write path for activity records.

use std::sync::Arc;

use chrono::Utc;
use sitework_core::{
  activity::{Activity, NewActivity},
  store::ActivityStore,
};
use uuid::Uuid;

use crate::{Error, Result};

/// The activity service. All activity writes flow through here so that
/// identity, timestamps, the unread default, and the project-title snapshot
/// are assigned in exactly one place.
pub struct ActivityLog<S> {
  store: Arc<S>,
}

impl<S> Clone for ActivityLog<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
    }
  }
}

impl<S: ActivityStore> ActivityLog<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub fn store(&self) -> &S { &self.store }

  /// Validate and persist one activity.
  ///
  /// Fails with [`sitework_core::Error::ProjectNotFound`] when the project
  /// does not exist, and with a taxonomy error when the linkage ids or the
  /// payload shape do not match the kind.
  pub async fn log_activity(&self, input: NewActivity) -> Result<Activity> {
    input.validate()?;

    let project = self
      .store
      .get_project(input.project_id)
      .await
      .map_err(Error::store)?
      .ok_or(sitework_core::Error::ProjectNotFound(input.project_id))?;

    let activity = Activity {
      activity_id:       Uuid::new_v4(),
      project_id:        input.project_id,
      task_id:           input.task_id,
      expense_id:        input.expense_id,
      inventory_item_id: input.inventory_item_id,
      kind:              input.kind,
      title_project:     project.title,
      is_read:           false,
      created_at:        Utc::now(),
      payload:           input.payload,
    };

    self
      .store
      .insert_activity(&activity)
      .await
      .map_err(Error::store)?;

    Ok(activity)
  }

  /// Persist one activity, swallowing failures.
  ///
  /// Activity logging is best-effort: the mutation that triggered it must
  /// not fail because the trail could not be written. Failures are logged
  /// at WARN and `None` is returned.
  pub async fn log_best_effort(&self, input: NewActivity) -> Option<Activity> {
    match self.log_activity(input).await {
      Ok(activity) => Some(activity),
      Err(error) => {
        tracing::warn!(%error, "failed to record activity");
        None
      }
    }
  }
}
