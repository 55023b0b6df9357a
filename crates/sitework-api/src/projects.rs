//! Handlers for `/projects` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/projects` | Body: [`NewProjectBody`]; returns 201 + stored project |
//! | `GET`  | `/projects/:id` | Single project |
//! | `POST` | `/projects/:id/clients` | Body: `{"client_id":"..."}`; idempotent |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sitework_core::{
  entity::{NewProject, Project, ProjectStatus},
  store::ActivityStore,
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

fn store_err<E>(e: E) -> ApiError
where
  E: std::error::Error + Send + Sync + 'static,
{
  ApiError::Internal(Box::new(e))
}

/// JSON body accepted by `POST /projects`.
#[derive(Debug, Deserialize)]
pub struct NewProjectBody {
  pub admin_id:     Uuid,
  pub title:        String,
  pub description:  String,
  pub limit_budget: f64,
  pub location:     String,
  pub status:       Option<ProjectStatus>,
  pub start_date:   DateTime<Utc>,
  pub end_date:     DateTime<Utc>,
}

impl From<NewProjectBody> for NewProject {
  fn from(b: NewProjectBody) -> Self {
    NewProject {
      admin_id:     b.admin_id,
      title:        b.title,
      description:  b.description,
      limit_budget: b.limit_budget,
      location:     b.location,
      status:       b.status.unwrap_or(ProjectStatus::Active),
      start_date:   b.start_date,
      end_date:     b.end_date,
    }
  }
}

/// `POST /projects` — returns 201 + the stored [`Project`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<NewProjectBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ActivityStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let project = state
    .log
    .store()
    .add_project(NewProject::from(body))
    .await
    .map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(project)))
}

/// `GET /projects/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Project>, ApiError>
where
  S: ActivityStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let project = state
    .log
    .store()
    .get_project(id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("project {id} not found")))?;
  Ok(Json(project))
}

#[derive(Debug, Deserialize)]
pub struct LinkClientBody {
  pub client_id: Uuid,
}

/// `POST /projects/:id/clients` — attach a client; idempotent.
pub async fn link_client<S>(
  State(state): State<AppState<S>>,
  Path(project_id): Path<Uuid>,
  Json(body): Json<LinkClientBody>,
) -> Result<StatusCode, ApiError>
where
  S: ActivityStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  state
    .log
    .store()
    .get_project(project_id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| {
      ApiError::NotFound(format!("project {project_id} not found"))
    })?;

  state
    .log
    .store()
    .link_client(project_id, body.client_id)
    .await
    .map_err(store_err)?;

  Ok(StatusCode::NO_CONTENT)
}
