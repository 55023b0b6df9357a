//! Update orchestration: snapshot, diff, apply, record.
//!
//! Each flow copies the entity before mutating it, diffs the requested
//! fields against that copy, applies the update, and records an activity
//! only when the diff found a real change. Recording is best-effort; a
//! failed write never fails the update itself.

use chrono::Utc;
use sitework_core::{
  activity::Activity,
  diff::{EntitySnapshot, diff, requested_fields},
  entity::{
    Expense, ExpenseLink, ExpenseUpdate, InventoryItem, InventoryItemUpdate,
    Task, TaskUpdate,
  },
  store::ActivityStore,
};

use crate::{ActivityLog, Result, recorder};

/// Apply a partial update to a task and record the resulting activity.
///
/// `updated_at` is bumped whenever an update is applied, changed or not.
/// Returns the recorded activity, or `None` when the update was a no-op or
/// the activity write failed.
pub async fn apply_task_update<S: ActivityStore>(
  log: &ActivityLog<S>,
  task: &mut Task,
  update: &TaskUpdate,
) -> Result<Option<Activity>> {
  let before = EntitySnapshot::of(task)?;
  let requested = requested_fields(update)?;
  let outcome = diff(Some(&before), &requested)?;

  update.apply_to(task);
  task.updated_at = Utc::now();

  let Some(input) = recorder::task_updated(task, outcome.changes) else {
    return Ok(None);
  };
  Ok(log.log_best_effort(input).await)
}

/// Apply a partial update spanning an expense and its project link row.
///
/// The link's `updated_at` is bumped whenever a link-owned field was
/// written, even if the written value was unchanged.
pub async fn apply_expense_update<S: ActivityStore>(
  log: &ActivityLog<S>,
  expense: &mut Expense,
  link: &mut ExpenseLink,
  update: &ExpenseUpdate,
) -> Result<Option<Activity>> {
  let before = EntitySnapshot::of(expense)?.with_link(link)?;
  let requested = requested_fields(update)?;
  let outcome = diff(Some(&before), &requested)?;

  update.apply_to(expense, link);
  expense.updated_at = Utc::now();
  if outcome.link_touched {
    link.updated_at = Utc::now();
  }

  let Some(input) = recorder::expense_updated(expense, outcome.changes) else {
    return Ok(None);
  };
  Ok(log.log_best_effort(input).await)
}

/// Apply a partial update to an inventory item; `remaining` is recomputed
/// from the applied `total` and `used`.
pub async fn apply_inventory_update<S: ActivityStore>(
  log: &ActivityLog<S>,
  item: &mut InventoryItem,
  update: &InventoryItemUpdate,
) -> Result<Option<Activity>> {
  let before = EntitySnapshot::of(item)?;
  let requested = requested_fields(update)?;
  let outcome = diff(Some(&before), &requested)?;

  update.apply_to(item);

  let Some(input) = recorder::inventory_updated(item, outcome.changes) else {
    return Ok(None);
  };
  Ok(log.log_best_effort(input).await)
}
