//! Error types for `sitework-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::activity::ActivityKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error("project not found: {0}")]
  ProjectNotFound(Uuid),

  #[error("activity not found: {0}")]
  ActivityNotFound(Uuid),

  #[error("no projects for this user: {0}")]
  NoProjectsForUser(Uuid),

  #[error("no unread activities found for project {0}")]
  NoUnreadActivities(Uuid),

  #[error("worker activity is resolved through team and task views")]
  WorkerFeed,

  #[error("cannot diff without a snapshot taken before the update")]
  MissingSnapshot,

  #[error("entity did not serialize to a field map")]
  SnapshotShape,

  #[error("{kind} must not carry a {field} linkage id")]
  LinkageMismatch {
    kind:  ActivityKind,
    field: &'static str,
  },

  #[error("{kind} requires a {field} linkage id")]
  MissingLinkage {
    kind:  ActivityKind,
    field: &'static str,
  },

  #[error("payload shape does not match activity kind {0}")]
  PayloadMismatch(ActivityKind),

  #[error("unknown activity kind: {0:?}")]
  UnknownKind(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
