//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Activity payloads are
//! stored as compact JSON in the legacy metadata shape, keyed by the
//! activity kind. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use sitework_core::{
  activity::{Activity, ActivityKind, ActivityPayload},
  entity::{Project, ProjectStatus},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── ActivityKind
// ─────────────────────────────────────────────────────────────

pub fn encode_kind(kind: ActivityKind) -> &'static str { kind.as_str() }

pub fn decode_kind(s: &str) -> Result<ActivityKind> {
  Ok(ActivityKind::parse(s)?)
}

// ─── ProjectStatus
// ────────────────────────────────────────────────────────────

pub fn encode_project_status(s: ProjectStatus) -> &'static str {
  match s {
    ProjectStatus::Active => "active",
    ProjectStatus::Inactive => "inactive",
  }
}

pub fn decode_project_status(s: &str) -> Result<ProjectStatus> {
  match s {
    "active" => Ok(ProjectStatus::Active),
    "inactive" => Ok(ProjectStatus::Inactive),
    other => Err(Error::UnknownProjectStatus(other.to_owned())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `activities` row.
pub struct RawActivity {
  pub activity_id:       String,
  pub project_id:        String,
  pub task_id:           Option<String>,
  pub expense_id:        Option<String>,
  pub inventory_item_id: Option<String>,
  pub kind:              String,
  pub title_project:     String,
  pub is_read:           bool,
  pub created_at:        String,
  pub metadata:          String,
}

impl RawActivity {
  pub fn into_activity(self) -> Result<Activity> {
    let kind = decode_kind(&self.kind)?;
    let metadata: serde_json::Value = serde_json::from_str(&self.metadata)?;
    let payload = ActivityPayload::from_metadata(kind, metadata)
      .map_err(Error::Core)?;

    Ok(Activity {
      activity_id: decode_uuid(&self.activity_id)?,
      project_id: decode_uuid(&self.project_id)?,
      task_id: self.task_id.as_deref().map(decode_uuid).transpose()?,
      expense_id: self.expense_id.as_deref().map(decode_uuid).transpose()?,
      inventory_item_id: self
        .inventory_item_id
        .as_deref()
        .map(decode_uuid)
        .transpose()?,
      kind,
      title_project: self.title_project,
      is_read: self.is_read,
      created_at: decode_dt(&self.created_at)?,
      payload,
    })
  }
}

/// Raw strings read directly from a `projects` row.
pub struct RawProject {
  pub project_id:   String,
  pub admin_id:     String,
  pub title:        String,
  pub description:  String,
  pub limit_budget: f64,
  pub location:     String,
  pub status:       String,
  pub start_date:   String,
  pub end_date:     String,
  pub created_at:   String,
}

impl RawProject {
  pub fn into_project(self) -> Result<Project> {
    Ok(Project {
      project_id:   decode_uuid(&self.project_id)?,
      admin_id:     decode_uuid(&self.admin_id)?,
      title:        self.title,
      description:  self.description,
      limit_budget: self.limit_budget,
      location:     self.location,
      status:       decode_project_status(&self.status)?,
      start_date:   decode_dt(&self.start_date)?,
      end_date:     decode_dt(&self.end_date)?,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}
