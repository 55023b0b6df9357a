//! Handlers for activity feed and read-state endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/activities` | Exactly one of `?admin_id`, `?client_id`, `?worker_id`; optional `is_read`, `kind` |
//! | `GET`  | `/projects/:id/activities` | Unfiltered project trail |
//! | `PUT`  | `/activities/:id/read` | Idempotent |
//! | `PUT`  | `/projects/:id/activities/read_all` | 404 when nothing is unread |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;
use sitework_core::{
  activity::{Activity, ActivityKind},
  store::ActivityStore,
  visibility::Caller,
};
use uuid::Uuid;

use crate::{
  AppState,
  error::ApiError,
};
use sitework_engine::{
  feed::{self, FeedFilter},
  read_state,
};

// ─── User feed ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UserFeedParams {
  pub admin_id:  Option<Uuid>,
  pub client_id: Option<Uuid>,
  pub worker_id: Option<Uuid>,
  pub is_read:   Option<bool>,
  pub kind:      Option<ActivityKind>,
}

impl UserFeedParams {
  fn caller(&self) -> Result<Caller, ApiError> {
    match (self.admin_id, self.client_id, self.worker_id) {
      (Some(admin_id), None, None) => Ok(Caller::Admin { admin_id }),
      (None, Some(client_id), None) => Ok(Caller::Client { client_id }),
      (None, None, Some(worker_id)) => Ok(Caller::Worker { worker_id }),
      _ => Err(ApiError::BadRequest(
        "exactly one of admin_id, client_id, worker_id is required".into(),
      )),
    }
  }

  fn filter(&self) -> FeedFilter {
    FeedFilter {
      is_read: self.is_read,
      kind:    self.kind,
    }
  }
}

/// `GET /activities?admin_id=<id>[&is_read=...][&kind=...]`
pub async fn user_feed<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<UserFeedParams>,
) -> Result<Json<Vec<Activity>>, ApiError>
where
  S: ActivityStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let caller = params.caller()?;
  let activities =
    feed::list_for_user(&state.log, caller, params.filter()).await?;
  Ok(Json(activities))
}

// ─── Project feed ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ProjectFeedParams {
  pub is_read: Option<bool>,
  pub kind:    Option<ActivityKind>,
}

/// `GET /projects/:id/activities`
pub async fn project_feed<S>(
  State(state): State<AppState<S>>,
  Path(project_id): Path<Uuid>,
  Query(params): Query<ProjectFeedParams>,
) -> Result<Json<Vec<Activity>>, ApiError>
where
  S: ActivityStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let filter = FeedFilter {
    is_read: params.is_read,
    kind:    params.kind,
  };
  let activities =
    feed::list_for_project(&state.log, project_id, filter).await?;
  Ok(Json(activities))
}

// ─── Read state ───────────────────────────────────────────────────────────────

/// `PUT /activities/:id/read`
pub async fn mark_read<S>(
  State(state): State<AppState<S>>,
  Path(activity_id): Path<Uuid>,
) -> Result<Json<Activity>, ApiError>
where
  S: ActivityStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let activity = read_state::mark_read(&state.log, activity_id).await?;
  Ok(Json(activity))
}

/// `PUT /projects/:id/activities/read_all`
pub async fn mark_all_read<S>(
  State(state): State<AppState<S>>,
  Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<Activity>>, ApiError>
where
  S: ActivityStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let affected = read_state::mark_all_read(&state.log, project_id).await?;
  Ok(Json(affected))
}
