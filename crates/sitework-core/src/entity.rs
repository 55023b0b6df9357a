//! Project, task, expense, and inventory entities, plus the partial-update
//! structs the engine diffs against snapshots.
//!
//! Update structs serialize with `skip_serializing_if = "Option::is_none"`
//! so that [`crate::diff::requested_fields`] sees only the fields a caller
//! actually supplied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Project ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
  Active,
  Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
  pub project_id:   Uuid,
  pub admin_id:     Uuid,
  pub title:        String,
  pub description:  String,
  pub limit_budget: f64,
  pub location:     String,
  pub status:       ProjectStatus,
  pub start_date:   DateTime<Utc>,
  pub end_date:     DateTime<Utc>,
  pub created_at:   DateTime<Utc>,
}

/// Input for creating a project. Id and creation timestamp are assigned by
/// the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProject {
  pub admin_id:     Uuid,
  pub title:        String,
  pub description:  String,
  pub limit_budget: f64,
  pub location:     String,
  pub status:       ProjectStatus,
  pub start_date:   DateTime<Utc>,
  pub end_date:     DateTime<Utc>,
}

// ─── Task ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
  Todo,
  InProgress,
  Done,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
  pub task_id:     Uuid,
  pub project_id:  Uuid,
  pub admin_id:    Uuid,
  pub worker_id:   Uuid,
  pub title:       String,
  pub description: Option<String>,
  pub status:      TaskStatus,
  pub start_date:  DateTime<Utc>,
  pub due_date:    Option<DateTime<Utc>>,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

/// A partial task update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskUpdate {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title:       Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status:      Option<TaskStatus>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub worker_id:   Option<Uuid>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub start_date:  Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub due_date:    Option<DateTime<Utc>>,
}

impl TaskUpdate {
  /// Write the supplied fields onto the task. Does not bump `updated_at`;
  /// the caller decides when the write counts as a modification.
  pub fn apply_to(&self, task: &mut Task) {
    if let Some(title) = &self.title {
      task.title = title.clone();
    }
    if let Some(description) = &self.description {
      task.description = Some(description.clone());
    }
    if let Some(status) = self.status {
      task.status = status;
    }
    if let Some(worker_id) = self.worker_id {
      task.worker_id = worker_id;
    }
    if let Some(start_date) = self.start_date {
      task.start_date = start_date;
    }
    if let Some(due_date) = self.due_date {
      task.due_date = Some(due_date);
    }
  }
}

// ─── Expense ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseStatus {
  Approved,
  Pending,
  Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
  pub expense_id:   Uuid,
  pub project_id:   Uuid,
  pub title:        String,
  pub expense_date: DateTime<Utc>,
  pub category:     String,
  pub description:  String,
  pub amount:       f64,
  pub status:       ExpenseStatus,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

/// The project-expense link row. It owns the approval trail; its
/// `updated_at` is bumped whenever a link-owned field is written, even when
/// the written value is unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseLink {
  pub project_id:  Uuid,
  pub expense_id:  Uuid,
  pub approved_by: Option<Uuid>,
  pub notes:       Option<String>,
  pub updated_at:  DateTime<Utc>,
}

/// A partial expense update spanning the expense row and its link row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseUpdate {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title:        Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub expense_date: Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub category:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description:  Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub amount:       Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status:       Option<ExpenseStatus>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub approved_by:  Option<Uuid>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub notes:        Option<String>,
}

impl ExpenseUpdate {
  pub fn apply_to(&self, expense: &mut Expense, link: &mut ExpenseLink) {
    if let Some(title) = &self.title {
      expense.title = title.clone();
    }
    if let Some(expense_date) = self.expense_date {
      expense.expense_date = expense_date;
    }
    if let Some(category) = &self.category {
      expense.category = category.clone();
    }
    if let Some(description) = &self.description {
      expense.description = description.clone();
    }
    if let Some(amount) = self.amount {
      expense.amount = amount;
    }
    if let Some(status) = self.status {
      expense.status = status;
    }
    if let Some(approved_by) = self.approved_by {
      link.approved_by = Some(approved_by);
    }
    if let Some(notes) = &self.notes {
      link.notes = Some(notes.clone());
    }
  }
}

// ─── Inventory ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryCategory {
  Services,
  Materials,
  Products,
  Labour,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryStatus {
  Installed,
  Pending,
  #[serde(rename = "In_Budget")]
  InBudget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
  pub inventory_item_id: Uuid,
  pub project_id:        Uuid,
  pub name:              String,
  pub category:          InventoryCategory,
  pub total:             f64,
  pub used:              f64,
  /// Always `total - used`; recomputed on every update.
  pub remaining:         f64,
  pub unit:              String,
  pub unit_cost:         f64,
  pub supplier:          String,
  pub status:            InventoryStatus,
}

/// A partial inventory update. `remaining` is derived and cannot be set
/// directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryItemUpdate {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub category:  Option<InventoryCategory>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub total:     Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub used:      Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub unit:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub unit_cost: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub supplier:  Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status:    Option<InventoryStatus>,
}

impl InventoryItemUpdate {
  pub fn apply_to(&self, item: &mut InventoryItem) {
    if let Some(name) = &self.name {
      item.name = name.clone();
    }
    if let Some(category) = self.category {
      item.category = category;
    }
    if let Some(total) = self.total {
      item.total = total;
    }
    if let Some(used) = self.used {
      item.used = used;
    }
    if let Some(unit) = &self.unit {
      item.unit = unit.clone();
    }
    if let Some(unit_cost) = self.unit_cost {
      item.unit_cost = unit_cost;
    }
    if let Some(supplier) = &self.supplier {
      item.supplier = supplier.clone();
    }
    if let Some(status) = self.status {
      item.status = status;
    }
    item.remaining = item.total - item.used;
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
