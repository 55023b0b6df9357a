//! Entity snapshot capture and the field-level differ.
//!
//! Computes the minimal `{field: {old, new}}` change-set between a snapshot
//! taken before an update and the fields the caller attempted to change.
//! An empty change-set means "no-op update" and callers must not record an
//! activity for it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result, activity::FieldMap};

// ─── Change-set ──────────────────────────────────────────────────────────────

/// One field's transition. Values are the JSON forms of the entity fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDelta {
  pub old: Value,
  pub new: Value,
}

/// The minimal field-level diff of a partial update. Transient; persisted
/// only inside an activity's `Updated` payload.
pub type ChangeSet = std::collections::BTreeMap<String, FieldDelta>;

/// Tolerance for monetary floats; differences below half a cent are treated
/// as currency rounding, not as a change.
pub const AMOUNT_EPSILON: f64 = 5e-3;

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// A full copy of an entity's fields, taken strictly before any field is
/// mutated in place. Mutating first and diffing against the same object
/// would always produce an empty change-set.
#[derive(Debug, Clone)]
pub struct EntitySnapshot {
  primary: FieldMap,
  link:    Option<FieldMap>,
}

impl EntitySnapshot {
  /// Capture the entity's current field map.
  pub fn of<T: Serialize>(entity: &T) -> Result<Self> {
    Ok(Self {
      primary: to_field_map(entity)?,
      link:    None,
    })
  }

  /// Attach the snapshot of a secondary linked record (e.g. an expense's
  /// project link row, which owns the approval note).
  pub fn with_link<L: Serialize>(mut self, link: &L) -> Result<Self> {
    self.link = Some(to_field_map(link)?);
    Ok(self)
  }
}

/// Serialise a partial-update struct into the set of fields it actually
/// carries. Update structs skip `None` fields, so absent fields never
/// appear here and are left untouched by the update.
pub fn requested_fields<U: Serialize>(update: &U) -> Result<FieldMap> {
  to_field_map(update)
}

fn to_field_map<T: Serialize>(value: &T) -> Result<FieldMap> {
  match serde_json::to_value(value)? {
    Value::Object(map) => Ok(map.into_iter().collect()),
    _ => Err(Error::SnapshotShape),
  }
}

// ─── Diff ────────────────────────────────────────────────────────────────────

/// The result of diffing a requested update against a snapshot.
#[derive(Debug, Clone, Default)]
pub struct DiffOutcome {
  pub changes:      ChangeSet,
  /// True when any requested field belongs to the secondary linked record,
  /// in which case the link's own `updated_at` must be bumped — even if the
  /// written value turned out to be a no-op.
  pub link_touched: bool,
}

impl DiffOutcome {
  pub fn is_noop(&self) -> bool { self.changes.is_empty() }
}

/// Compute the change-set for a partial update.
///
/// Fields present in `requested` but absent from both the primary and the
/// link snapshot do not belong to the entity's schema and are ignored.
/// Fails with [`Error::MissingSnapshot`] when `before` is `None` — the
/// entity must have existed prior to diffing.
pub fn diff(
  before: Option<&EntitySnapshot>,
  requested: &FieldMap,
) -> Result<DiffOutcome> {
  let before = before.ok_or(Error::MissingSnapshot)?;
  let mut outcome = DiffOutcome::default();

  for (field, new) in requested {
    if let Some(old) = before.primary.get(field) {
      if !values_equal(old, new) {
        outcome.changes.insert(field.clone(), FieldDelta {
          old: old.clone(),
          new: new.clone(),
        });
      }
    } else if let Some(link) = &before.link
      && let Some(old) = link.get(field)
    {
      outcome.link_touched = true;
      if !values_equal(old, new) {
        outcome.changes.insert(field.clone(), FieldDelta {
          old: old.clone(),
          new: new.clone(),
        });
      }
    }
  }

  Ok(outcome)
}

/// Equality after normalization: timestamps are compared at whole-second
/// precision, numbers as f64 within [`AMOUNT_EPSILON`], everything else
/// structurally.
fn values_equal(old: &Value, new: &Value) -> bool {
  if let (Some(a), Some(b)) = (as_timestamp(old), as_timestamp(new)) {
    return a.timestamp() == b.timestamp();
  }
  if let (Value::Number(a), Value::Number(b)) = (old, new)
    && let (Some(x), Some(y)) = (a.as_f64(), b.as_f64())
  {
    return (x - y).abs() < AMOUNT_EPSILON;
  }
  old == new
}

fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
  value
    .as_str()
    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    .map(|dt| dt.with_timezone(&Utc))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
