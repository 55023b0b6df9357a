//! Recorders: build [`NewActivity`] inputs from entity state.
//!
//! Each recorder fixes the salient-field set its payload carries, so the
//! metadata shape of every kind is decided here and nowhere else.

use serde::Serialize;
use serde_json::Value;
use sitework_core::{
  Result,
  activity::{ActivityKind, ActivityPayload, FieldMap, NewActivity},
  diff::ChangeSet,
  entity::{Expense, InventoryItem, Task},
};

fn value<T: Serialize>(v: &T) -> Result<Value> {
  Ok(serde_json::to_value(v)?)
}

fn fields(pairs: Vec<(&str, Value)>) -> FieldMap {
  pairs.into_iter().map(|(k, v)| (k.to_owned(), v)).collect()
}

// ─── Creation ────────────────────────────────────────────────────────────────

/// `task_created` with the assigned worker's display name.
pub fn task_created(task: &Task, worker_name: &str) -> Result<NewActivity> {
  let payload = ActivityPayload::Created(fields(vec![
    ("title", value(&task.title)?),
    ("worker", value(&worker_name)?),
    ("description", value(&task.description)?),
    ("status", value(&task.status)?),
    ("due_date", value(&task.due_date)?),
  ]));
  Ok(
    NewActivity::new(ActivityKind::TaskCreated, task.project_id, payload)
      .with_task(task.task_id),
  )
}

pub fn expense_added(expense: &Expense) -> Result<NewActivity> {
  let payload = ActivityPayload::Created(fields(vec![
    ("title", value(&expense.title)?),
    ("date", value(&expense.expense_date)?),
    ("category", value(&expense.category)?),
    ("description", value(&expense.description)?),
    ("amount", value(&expense.amount)?),
    ("status", value(&expense.status)?),
  ]));
  Ok(
    NewActivity::new(ActivityKind::ExpenseAdded, expense.project_id, payload)
      .with_expense(expense.expense_id),
  )
}

pub fn inventory_added(item: &InventoryItem) -> Result<NewActivity> {
  let payload = ActivityPayload::Created(fields(vec![
    ("title", value(&item.name)?),
    ("quantity", value(&item.total)?),
    ("unit", value(&item.unit)?),
    ("unit_cost", value(&item.unit_cost)?),
    ("supplier", value(&item.supplier)?),
    ("status", value(&item.status)?),
  ]));
  Ok(
    NewActivity::new(ActivityKind::InventoryAdded, item.project_id, payload)
      .with_inventory_item(item.inventory_item_id),
  )
}

// ─── Update ──────────────────────────────────────────────────────────────────

fn status_moved_to(changes: &ChangeSet, target: &str) -> bool {
  changes
    .get("status")
    .is_some_and(|delta| delta.new == Value::String(target.to_owned()))
}

/// `task_updated`, upgraded to `task_completed` when the change-set moves
/// the status to done. Returns `None` for an empty change-set.
pub fn task_updated(task: &Task, changes: ChangeSet) -> Option<NewActivity> {
  if changes.is_empty() {
    return None;
  }
  let kind = if status_moved_to(&changes, "done") {
    ActivityKind::TaskCompleted
  } else {
    ActivityKind::TaskUpdated
  };
  let payload = ActivityPayload::Updated {
    title: task.title.clone(),
    changes,
  };
  Some(NewActivity::new(kind, task.project_id, payload).with_task(task.task_id))
}

/// `expense_updated`, upgraded to `expense_approved` when the change-set
/// moves the status to Approved. Returns `None` for an empty change-set.
pub fn expense_updated(
  expense: &Expense,
  changes: ChangeSet,
) -> Option<NewActivity> {
  if changes.is_empty() {
    return None;
  }
  let kind = if status_moved_to(&changes, "Approved") {
    ActivityKind::ExpenseApproved
  } else {
    ActivityKind::ExpenseUpdated
  };
  let payload = ActivityPayload::Updated {
    title: expense.title.clone(),
    changes,
  };
  Some(
    NewActivity::new(kind, expense.project_id, payload)
      .with_expense(expense.expense_id),
  )
}

/// Returns `None` for an empty change-set.
pub fn inventory_updated(
  item: &InventoryItem,
  changes: ChangeSet,
) -> Option<NewActivity> {
  if changes.is_empty() {
    return None;
  }
  let payload = ActivityPayload::Updated {
    title: item.name.clone(),
    changes,
  };
  Some(
    NewActivity::new(ActivityKind::InventoryUpdated, item.project_id, payload)
      .with_inventory_item(item.inventory_item_id),
  )
}

// ─── Deletion ────────────────────────────────────────────────────────────────

// Deletion payloads snapshot the row before it is removed; the activity
// carries no linkage id because the referenced row no longer exists.

pub fn task_deleted(task: &Task) -> Result<NewActivity> {
  let payload = ActivityPayload::Deleted(fields(vec![
    ("title", value(&task.title)?),
    ("description", value(&task.description)?),
    ("status", value(&task.status)?),
    ("due_date", value(&task.due_date)?),
  ]));
  Ok(NewActivity::new(
    ActivityKind::TaskDeleted,
    task.project_id,
    payload,
  ))
}

pub fn expense_deleted(expense: &Expense) -> Result<NewActivity> {
  let payload = ActivityPayload::Deleted(fields(vec![
    ("id", value(&expense.expense_id)?),
    ("title", value(&expense.title)?),
    ("amount", value(&expense.amount)?),
    ("category", value(&expense.category)?),
  ]));
  Ok(NewActivity::new(
    ActivityKind::ExpenseDeleted,
    expense.project_id,
    payload,
  ))
}

pub fn inventory_deleted(item: &InventoryItem) -> Result<NewActivity> {
  let payload = ActivityPayload::Deleted(fields(vec![
    ("name", value(&item.name)?),
    ("unit", value(&item.unit)?),
    ("unit_cost", value(&item.unit_cost)?),
    ("total", value(&item.total)?),
    ("used", value(&item.used)?),
  ]));
  Ok(NewActivity::new(
    ActivityKind::InventoryDeleted,
    item.project_id,
    payload,
  ))
}
