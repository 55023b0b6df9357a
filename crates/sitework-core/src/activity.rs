//! Activity taxonomy and the persisted activity record.
//!
//! An activity is one record of a notable mutation (create/update/delete/
//! approve) tied to a project and optionally to the task, expense, or
//! inventory item that caused it. Activities are append-only: the only field
//! ever mutated after insert is the `is_read` flag.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, ser::SerializeStruct};
use serde_json::Value;
use uuid::Uuid;

use crate::{
  Error, Result,
  diff::{ChangeSet, FieldDelta},
};

// ─── Taxonomy ────────────────────────────────────────────────────────────────

/// The grouping of an [`ActivityKind`], used by the role-based visibility
/// policy (clients never see the Expense category).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Task,
  Expense,
  Inventory,
}

/// The closed set of event kinds the engine records. The snake_case string
/// form is the discriminant stored in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
  TaskCreated,
  TaskUpdated,
  TaskCompleted,
  TaskDeleted,
  ExpenseAdded,
  ExpenseApproved,
  ExpenseUpdated,
  ExpenseDeleted,
  InventoryAdded,
  InventoryUpdated,
  InventoryDeleted,
}

/// Which metadata shape a kind carries on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
  /// Salient fields of a freshly created row.
  Snapshot,
  /// A field-level change-set produced by the differ.
  Changes,
  /// Salient fields of a row captured just before deletion.
  Deleted,
}

impl ActivityKind {
  pub const ALL: [ActivityKind; 11] = [
    Self::TaskCreated,
    Self::TaskUpdated,
    Self::TaskCompleted,
    Self::TaskDeleted,
    Self::ExpenseAdded,
    Self::ExpenseApproved,
    Self::ExpenseUpdated,
    Self::ExpenseDeleted,
    Self::InventoryAdded,
    Self::InventoryUpdated,
    Self::InventoryDeleted,
  ];

  /// The discriminant string stored in the `kind` column.
  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::TaskCreated => "task_created",
      Self::TaskUpdated => "task_updated",
      Self::TaskCompleted => "task_completed",
      Self::TaskDeleted => "task_deleted",
      Self::ExpenseAdded => "expense_added",
      Self::ExpenseApproved => "expense_approved",
      Self::ExpenseUpdated => "expense_updated",
      Self::ExpenseDeleted => "expense_deleted",
      Self::InventoryAdded => "inventory_added",
      Self::InventoryUpdated => "inventory_updated",
      Self::InventoryDeleted => "inventory_deleted",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    Self::ALL
      .into_iter()
      .find(|k| k.as_str() == s)
      .ok_or_else(|| Error::UnknownKind(s.to_owned()))
  }

  pub fn category(&self) -> Category {
    match self {
      Self::TaskCreated
      | Self::TaskUpdated
      | Self::TaskCompleted
      | Self::TaskDeleted => Category::Task,
      Self::ExpenseAdded
      | Self::ExpenseApproved
      | Self::ExpenseUpdated
      | Self::ExpenseDeleted => Category::Expense,
      Self::InventoryAdded
      | Self::InventoryUpdated
      | Self::InventoryDeleted => Category::Inventory,
    }
  }

  /// Which linkage id this kind populates: `None` for deletion kinds (the
  /// referenced row is gone by the time the activity is written), otherwise
  /// exactly the id matching the kind's category.
  pub fn linkage(&self) -> Option<Category> {
    match self {
      Self::TaskDeleted | Self::ExpenseDeleted | Self::InventoryDeleted => {
        None
      }
      other => Some(other.category()),
    }
  }

  pub fn payload_shape(&self) -> PayloadShape {
    match self {
      Self::TaskCreated | Self::ExpenseAdded | Self::InventoryAdded => {
        PayloadShape::Snapshot
      }
      Self::TaskUpdated
      | Self::TaskCompleted
      | Self::ExpenseApproved
      | Self::ExpenseUpdated
      | Self::InventoryUpdated => PayloadShape::Changes,
      Self::TaskDeleted | Self::ExpenseDeleted | Self::InventoryDeleted => {
        PayloadShape::Deleted
      }
    }
  }

  /// All kinds belonging to one of `categories`.
  pub fn kinds_in(categories: &[Category]) -> Vec<ActivityKind> {
    Self::ALL
      .into_iter()
      .filter(|k| categories.contains(&k.category()))
      .collect()
  }
}

impl std::fmt::Display for ActivityKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Payload ─────────────────────────────────────────────────────────────────

/// A plain map of field name to JSON value, used for entity snapshots.
pub type FieldMap = BTreeMap<String, Value>;

/// The typed payload of an activity. The variant must match the kind's
/// [`PayloadShape`]; serialisation produces the legacy flat metadata map.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityPayload {
  /// Salient fields of the row that was created.
  Created(FieldMap),
  /// The entity's display title plus the change-set from the differ.
  Updated { title: String, changes: ChangeSet },
  /// Salient fields captured before the row was deleted.
  Deleted(FieldMap),
}

/// The metadata key deletion snapshots are stored under.
fn deleted_key(category: Category) -> &'static str {
  match category {
    Category::Task => "deleted_task",
    Category::Expense => "deleted_expense",
    Category::Inventory => "deleted_item",
  }
}

impl ActivityPayload {
  pub fn shape(&self) -> PayloadShape {
    match self {
      Self::Created(_) => PayloadShape::Snapshot,
      Self::Updated { .. } => PayloadShape::Changes,
      Self::Deleted(_) => PayloadShape::Deleted,
    }
  }

  /// Render the on-the-wire metadata map for the `metadata` column.
  pub fn to_metadata(&self, kind: ActivityKind) -> Value {
    match self {
      Self::Created(fields) => {
        Value::Object(fields.clone().into_iter().collect())
      }
      Self::Updated { title, changes } => {
        let rendered: serde_json::Map<String, Value> = changes
          .iter()
          .map(|(field, delta)| {
            (
              field.clone(),
              serde_json::json!({ "old": delta.old, "new": delta.new }),
            )
          })
          .collect();
        serde_json::json!({ "title": title, "changes": rendered })
      }
      Self::Deleted(fields) => {
        let snapshot = Value::Object(fields.clone().into_iter().collect());
        let mut map = serde_json::Map::new();
        map.insert(deleted_key(kind.category()).to_owned(), snapshot);
        Value::Object(map)
      }
    }
  }

  /// Rebuild the typed payload from the metadata map stored in the database.
  /// The kind selects the expected shape.
  pub fn from_metadata(kind: ActivityKind, metadata: Value) -> Result<Self> {
    let Value::Object(map) = metadata else {
      return Err(Error::PayloadMismatch(kind));
    };

    match kind.payload_shape() {
      PayloadShape::Snapshot => Ok(Self::Created(map.into_iter().collect())),
      PayloadShape::Changes => {
        let title = map
          .get("title")
          .and_then(Value::as_str)
          .unwrap_or_default()
          .to_owned();
        let Some(Value::Object(raw)) = map.get("changes") else {
          return Err(Error::PayloadMismatch(kind));
        };
        let mut changes = ChangeSet::new();
        for (field, delta) in raw {
          let Value::Object(d) = delta else {
            return Err(Error::PayloadMismatch(kind));
          };
          changes.insert(field.clone(), FieldDelta {
            old: d.get("old").cloned().unwrap_or(Value::Null),
            new: d.get("new").cloned().unwrap_or(Value::Null),
          });
        }
        Ok(Self::Updated { title, changes })
      }
      PayloadShape::Deleted => {
        let Some(Value::Object(snapshot)) =
          map.get(deleted_key(kind.category()))
        else {
          return Err(Error::PayloadMismatch(kind));
        };
        Ok(Self::Deleted(snapshot.clone().into_iter().collect()))
      }
    }
  }
}

// ─── Activity ────────────────────────────────────────────────────────────────

/// One persisted activity record. Immutable after insert except for
/// `is_read`, which may flip false→true exactly once (idempotently).
#[derive(Debug, Clone)]
pub struct Activity {
  pub activity_id:       Uuid,
  /// The owning project. Required and immutable; activities are removed
  /// only by cascading deletion of this project.
  pub project_id:        Uuid,
  pub task_id:           Option<Uuid>,
  pub expense_id:        Option<Uuid>,
  pub inventory_item_id: Option<Uuid>,
  pub kind:              ActivityKind,
  /// Project title snapshotted at write time, so the record stays readable
  /// after the project is renamed or deleted.
  pub title_project:     String,
  pub is_read:           bool,
  /// Service-assigned timestamp; never changes after creation.
  pub created_at:        DateTime<Utc>,
  pub payload:           ActivityPayload,
}

// Serialisation flattens the payload into the legacy `metadata` map so the
// persisted and JSON shapes match the original rows.
impl Serialize for Activity {
  fn serialize<S: serde::Serializer>(
    &self,
    serializer: S,
  ) -> std::result::Result<S::Ok, S::Error> {
    let mut st = serializer.serialize_struct("Activity", 10)?;
    st.serialize_field("activity_id", &self.activity_id)?;
    st.serialize_field("project_id", &self.project_id)?;
    st.serialize_field("task_id", &self.task_id)?;
    st.serialize_field("expense_id", &self.expense_id)?;
    st.serialize_field("inventory_item_id", &self.inventory_item_id)?;
    st.serialize_field("kind", &self.kind)?;
    st.serialize_field("title_project", &self.title_project)?;
    st.serialize_field("is_read", &self.is_read)?;
    st.serialize_field("created_at", &self.created_at)?;
    st.serialize_field("metadata", &self.payload.to_metadata(self.kind))?;
    st.end()
  }
}

impl<'de> Deserialize<'de> for Activity {
  fn deserialize<D: serde::Deserializer<'de>>(
    deserializer: D,
  ) -> std::result::Result<Self, D::Error> {
    #[derive(Deserialize)]
    struct Wire {
      activity_id:       Uuid,
      project_id:        Uuid,
      #[serde(default)]
      task_id:           Option<Uuid>,
      #[serde(default)]
      expense_id:        Option<Uuid>,
      #[serde(default)]
      inventory_item_id: Option<Uuid>,
      kind:              ActivityKind,
      title_project:     String,
      is_read:           bool,
      created_at:        DateTime<Utc>,
      #[serde(default)]
      metadata:          Value,
    }

    let w = Wire::deserialize(deserializer)?;
    let payload = ActivityPayload::from_metadata(w.kind, w.metadata)
      .map_err(serde::de::Error::custom)?;
    Ok(Activity {
      activity_id: w.activity_id,
      project_id: w.project_id,
      task_id: w.task_id,
      expense_id: w.expense_id,
      inventory_item_id: w.inventory_item_id,
      kind: w.kind,
      title_project: w.title_project,
      is_read: w.is_read,
      created_at: w.created_at,
      payload,
    })
  }
}

// ─── NewActivity ─────────────────────────────────────────────────────────────

/// Input to the activity service. Identity, timestamp, read flag, and the
/// project-title snapshot are assigned by the service, never by callers.
#[derive(Debug, Clone)]
pub struct NewActivity {
  pub kind:              ActivityKind,
  pub project_id:        Uuid,
  pub task_id:           Option<Uuid>,
  pub expense_id:        Option<Uuid>,
  pub inventory_item_id: Option<Uuid>,
  pub payload:           ActivityPayload,
}

impl NewActivity {
  pub fn new(
    kind: ActivityKind,
    project_id: Uuid,
    payload: ActivityPayload,
  ) -> Self {
    Self {
      kind,
      project_id,
      task_id: None,
      expense_id: None,
      inventory_item_id: None,
      payload,
    }
  }

  pub fn with_task(mut self, task_id: Uuid) -> Self {
    self.task_id = Some(task_id);
    self
  }

  pub fn with_expense(mut self, expense_id: Uuid) -> Self {
    self.expense_id = Some(expense_id);
    self
  }

  pub fn with_inventory_item(mut self, inventory_item_id: Uuid) -> Self {
    self.inventory_item_id = Some(inventory_item_id);
    self
  }

  /// Check the taxonomy invariants: the payload variant must match the
  /// kind's shape, and exactly the linkage id declared by the kind (zero
  /// for deletion kinds, one otherwise) must be populated.
  pub fn validate(&self) -> Result<()> {
    if self.payload.shape() != self.kind.payload_shape() {
      return Err(Error::PayloadMismatch(self.kind));
    }

    let allowed = self.kind.linkage();
    let slots = [
      (Category::Task, self.task_id.is_some(), "task"),
      (Category::Expense, self.expense_id.is_some(), "expense"),
      (Category::Inventory, self.inventory_item_id.is_some(), "inventory"),
    ];
    for (category, populated, field) in slots {
      match (allowed == Some(category), populated) {
        (false, true) => {
          return Err(Error::LinkageMismatch { kind: self.kind, field });
        }
        (true, false) => {
          return Err(Error::MissingLinkage { kind: self.kind, field });
        }
        _ => {}
      }
    }
    Ok(())
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn field_map(pairs: &[(&str, Value)]) -> FieldMap {
    pairs
      .iter()
      .map(|(k, v)| ((*k).to_owned(), v.clone()))
      .collect()
  }

  #[test]
  fn kind_strings_round_trip() {
    for kind in ActivityKind::ALL {
      assert_eq!(ActivityKind::parse(kind.as_str()).unwrap(), kind);
    }
    assert!(matches!(
      ActivityKind::parse("project_renamed"),
      Err(Error::UnknownKind(_))
    ));
  }

  #[test]
  fn deletion_kinds_carry_no_linkage() {
    for kind in [
      ActivityKind::TaskDeleted,
      ActivityKind::ExpenseDeleted,
      ActivityKind::InventoryDeleted,
    ] {
      assert_eq!(kind.linkage(), None);
    }
  }

  #[test]
  fn update_kinds_link_their_own_category() {
    assert_eq!(ActivityKind::TaskUpdated.linkage(), Some(Category::Task));
    assert_eq!(ActivityKind::TaskCompleted.linkage(), Some(Category::Task));
    assert_eq!(
      ActivityKind::ExpenseApproved.linkage(),
      Some(Category::Expense)
    );
    assert_eq!(
      ActivityKind::InventoryUpdated.linkage(),
      Some(Category::Inventory)
    );
  }

  #[test]
  fn validate_rejects_wrong_linkage() {
    let payload =
      ActivityPayload::Created(field_map(&[("title", json!("Demo"))]));
    let input =
      NewActivity::new(ActivityKind::ExpenseAdded, Uuid::new_v4(), payload)
        .with_task(Uuid::new_v4());
    assert!(matches!(
      input.validate(),
      Err(Error::LinkageMismatch { field: "task", .. })
    ));
  }

  #[test]
  fn validate_requires_the_matching_linkage() {
    let payload =
      ActivityPayload::Created(field_map(&[("title", json!("Demo"))]));
    let input =
      NewActivity::new(ActivityKind::ExpenseAdded, Uuid::new_v4(), payload);
    assert!(matches!(
      input.validate(),
      Err(Error::MissingLinkage { field: "expense", .. })
    ));
  }

  #[test]
  fn validate_rejects_payload_shape_mismatch() {
    let payload =
      ActivityPayload::Created(field_map(&[("title", json!("Demo"))]));
    let input =
      NewActivity::new(ActivityKind::TaskUpdated, Uuid::new_v4(), payload)
        .with_task(Uuid::new_v4());
    assert!(matches!(input.validate(), Err(Error::PayloadMismatch(_))));
  }

  #[test]
  fn deletion_kinds_validate_with_no_linkage() {
    let payload =
      ActivityPayload::Deleted(field_map(&[("amount", json!(120.50))]));
    let input =
      NewActivity::new(ActivityKind::ExpenseDeleted, Uuid::new_v4(), payload);
    input.validate().unwrap();
  }

  #[test]
  fn updated_payload_renders_changes_map() {
    let mut changes = ChangeSet::new();
    changes.insert("status".into(), FieldDelta {
      old: json!("todo"),
      new: json!("in_progress"),
    });
    let payload = ActivityPayload::Updated {
      title: "Install cabinets".into(),
      changes,
    };

    let metadata = payload.to_metadata(ActivityKind::TaskUpdated);
    assert_eq!(
      metadata,
      json!({
        "title": "Install cabinets",
        "changes": { "status": { "old": "todo", "new": "in_progress" } },
      })
    );
  }

  #[test]
  fn deleted_payload_uses_category_key() {
    let payload = ActivityPayload::Deleted(field_map(&[
      ("amount", json!(120.50)),
      ("category", json!("Materials")),
    ]));
    let metadata = payload.to_metadata(ActivityKind::ExpenseDeleted);
    assert_eq!(metadata["deleted_expense"]["amount"], json!(120.50));

    let item = ActivityPayload::Deleted(field_map(&[("name", json!("Pipe"))]));
    let metadata = item.to_metadata(ActivityKind::InventoryDeleted);
    assert!(metadata.get("deleted_item").is_some());
  }

  #[test]
  fn payload_metadata_round_trips() {
    let mut changes = ChangeSet::new();
    changes.insert("amount".into(), FieldDelta {
      old: json!(100.0),
      new: json!(120.50),
    });
    let payload = ActivityPayload::Updated {
      title: "Tile order".into(),
      changes,
    };

    let metadata = payload.to_metadata(ActivityKind::ExpenseUpdated);
    let decoded =
      ActivityPayload::from_metadata(ActivityKind::ExpenseUpdated, metadata)
        .unwrap();
    assert_eq!(decoded, payload);
  }

  #[test]
  fn activity_serializes_with_flat_metadata() {
    let activity = Activity {
      activity_id:       Uuid::new_v4(),
      project_id:        Uuid::new_v4(),
      task_id:           Some(Uuid::new_v4()),
      expense_id:        None,
      inventory_item_id: None,
      kind:              ActivityKind::TaskUpdated,
      title_project:     "Kitchen Remodel".into(),
      is_read:           false,
      created_at:        Utc::now(),
      payload:           ActivityPayload::Updated {
        title:   "Install cabinets".into(),
        changes: ChangeSet::new(),
      },
    };

    let value = serde_json::to_value(&activity).unwrap();
    assert_eq!(value["kind"], json!("task_updated"));
    assert_eq!(value["title_project"], json!("Kitchen Remodel"));
    assert!(value["metadata"]["changes"].is_object());

    let decoded: Activity = serde_json::from_value(value).unwrap();
    assert_eq!(decoded.kind, ActivityKind::TaskUpdated);
    assert_eq!(decoded.payload, activity.payload);
  }
}
