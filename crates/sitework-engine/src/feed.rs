//! Role-filtered activity feeds.

use serde::Deserialize;
use sitework_core::{
  activity::{Activity, ActivityKind},
  store::{ActivityFilter, ActivityStore},
  visibility::{Caller, allowed_categories},
};
use uuid::Uuid;

use crate::{ActivityLog, Error, Result};

/// Optional feed narrowing supplied by the caller.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct FeedFilter {
  pub is_read: Option<bool>,
  pub kind:    Option<ActivityKind>,
}

/// The cross-project feed for one user, newest first.
///
/// Admins see activities of the projects they own; clients see activities
/// of the projects they are attached to, minus the expense category.
/// Workers have no feed and are rejected with
/// [`sitework_core::Error::WorkerFeed`]. A user attached to zero projects
/// gets [`sitework_core::Error::NoProjectsForUser`], not an empty feed.
pub async fn list_for_user<S: ActivityStore>(
  log: &ActivityLog<S>,
  caller: Caller,
  filter: FeedFilter,
) -> Result<Vec<Activity>> {
  let project_ids = match caller {
    Caller::Worker { .. } => {
      return Err(sitework_core::Error::WorkerFeed.into());
    }
    Caller::Admin { admin_id } => log
      .store()
      .admin_project_ids(admin_id)
      .await
      .map_err(Error::store)?,
    Caller::Client { client_id } => log
      .store()
      .client_project_ids(client_id)
      .await
      .map_err(Error::store)?,
  };

  if project_ids.is_empty() {
    return Err(sitework_core::Error::NoProjectsForUser(caller.id()).into());
  }

  let query = ActivityFilter {
    project_ids,
    categories: Some(allowed_categories(caller.role()).to_vec()),
    is_read: filter.is_read,
    kind: filter.kind,
  };

  log.store().list_activities(&query).await.map_err(Error::store)
}

/// All activities of one project, newest first. No role filter; the caller
/// is assumed to be an admin surface.
pub async fn list_for_project<S: ActivityStore>(
  log: &ActivityLog<S>,
  project_id: Uuid,
  filter: FeedFilter,
) -> Result<Vec<Activity>> {
  log
    .store()
    .get_project(project_id)
    .await
    .map_err(Error::store)?
    .ok_or(sitework_core::Error::ProjectNotFound(project_id))?;

  let query = ActivityFilter {
    project_ids: vec![project_id],
    categories: None,
    is_read: filter.is_read,
    kind: filter.kind,
  };

  log.store().list_activities(&query).await.map_err(Error::store)
}
