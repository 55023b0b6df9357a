//! The `ActivityStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `sitework-store-sqlite`). Higher layers (`sitework-engine`,
//! `sitework-api`) depend on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  activity::{Activity, ActivityKind, Category},
  entity::{NewProject, Project},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`ActivityStore::list_activities`].
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
  /// Restrict to activities belonging to these projects. Empty means no
  /// project restriction.
  pub project_ids: Vec<Uuid>,
  /// Restrict to activities whose kind falls in these categories. `None`
  /// means all categories.
  pub categories:  Option<Vec<Category>>,
  /// Restrict by read state.
  pub is_read:     Option<bool>,
  /// Restrict to a single activity kind.
  pub kind:        Option<ActivityKind>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an activity store backend.
///
/// The store is mechanical: it persists and retrieves; it does not apply
/// visibility policy or decide when an empty result is an error. That logic
/// lives in `sitework-engine`.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ActivityStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Projects ──────────────────────────────────────────────────────────

  /// Create and persist a new project. The id and creation timestamp are
  /// assigned by the store.
  fn add_project(
    &self,
    input: NewProject,
  ) -> impl Future<Output = Result<Project, Self::Error>> + Send + '_;

  /// Retrieve a project by id. Returns `None` if not found.
  fn get_project(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Project>, Self::Error>> + Send + '_;

  /// List all projects, optionally restricted to one admin.
  fn list_projects(
    &self,
    admin_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<Project>, Self::Error>> + Send + '_;

  /// Delete a project and, by cascade, its client links and activities.
  /// Returns `false` if the project did not exist.
  fn delete_project(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Attach a client to a project. Idempotent.
  fn link_client(
    &self,
    project_id: Uuid,
    client_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Ids of the projects a client is attached to.
  fn client_project_ids(
    &self,
    client_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;

  /// Ids of the projects an admin owns.
  fn admin_project_ids(
    &self,
    admin_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;

  // ── Activities ────────────────────────────────────────────────────────

  /// Persist a fully-formed activity record.
  fn insert_activity<'a>(
    &'a self,
    activity: &'a Activity,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Retrieve an activity by id. Returns `None` if not found.
  fn get_activity(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Activity>, Self::Error>> + Send + '_;

  /// List activities matching `filter`, newest first.
  fn list_activities<'a>(
    &'a self,
    filter: &'a ActivityFilter,
  ) -> impl Future<Output = Result<Vec<Activity>, Self::Error>> + Send + 'a;

  /// Mark one activity read and return it. Idempotent: marking an
  /// already-read activity succeeds and returns the unchanged record.
  /// Returns `None` if the activity does not exist.
  fn set_read(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Activity>, Self::Error>> + Send + '_;

  /// Mark every unread activity of a project read, atomically, and return
  /// the affected records. The result is empty when nothing was unread.
  fn mark_all_read(
    &self,
    project_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Activity>, Self::Error>> + Send + '_;
}
