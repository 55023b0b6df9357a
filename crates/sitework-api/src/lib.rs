//! JSON REST API for the Sitework activity engine.
//!
//! Exposes an axum [`Router`] backed by any
//! [`sitework_core::store::ActivityStore`]. Auth, TLS, and transport
//! concerns are the caller's responsibility.

pub mod activities;
pub mod error;
pub mod projects;

use std::path::PathBuf;

use axum::{
  Router,
  routing::{get, post, put},
};
use serde::Deserialize;
use sitework_core::store::ActivityStore;
use sitework_engine::ActivityLog;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub log: ActivityLog<S>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      log: self.log.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ActivityStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Feeds and read state
    .route("/activities", get(activities::user_feed::<S>))
    .route("/activities/{id}/read", put(activities::mark_read::<S>))
    // Projects
    .route("/projects", post(projects::create::<S>))
    .route("/projects/{id}", get(projects::get_one::<S>))
    .route("/projects/{id}/clients", post(projects::link_client::<S>))
    .route("/projects/{id}/activities", get(activities::project_feed::<S>))
    .route(
      "/projects/{id}/activities/read_all",
      put(activities::mark_all_read::<S>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use chrono::{Duration, Utc};
  use serde_json::{Value, json};
  use sitework_core::{
    entity::{
      Expense, ExpenseStatus, InventoryCategory, InventoryItem,
      InventoryStatus, NewProject, Project, ProjectStatus, Task, TaskStatus,
    },
    store::ActivityStore,
  };
  use sitework_engine::recorder;
  use sitework_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;
  use uuid::Uuid;

  use super::*;

  async fn state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState {
      log: ActivityLog::new(Arc::new(store)),
    }
  }

  async fn request(
    state: AppState<SqliteStore>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = router(state)
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();

    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn seed_project(
    state: &AppState<SqliteStore>,
    admin_id: Uuid,
  ) -> Project {
    state
      .log
      .store()
      .add_project(NewProject {
        admin_id,
        title: "Kitchen Remodel".into(),
        description: "Full kitchen renovation".into(),
        limit_budget: 25_000.0,
        location: "12 Elm St".into(),
        status: ProjectStatus::Active,
        start_date: Utc::now(),
        end_date: Utc::now() + Duration::days(60),
      })
      .await
      .unwrap()
  }

  /// One task, one expense, one inventory activity.
  async fn seed_activities(state: &AppState<SqliteStore>, project_id: Uuid) {
    let task = Task {
      task_id:     Uuid::new_v4(),
      project_id,
      admin_id:    Uuid::new_v4(),
      worker_id:   Uuid::new_v4(),
      title:       "Install cabinets".into(),
      description: None,
      status:      TaskStatus::Todo,
      start_date:  Utc::now(),
      due_date:    None,
      created_at:  Utc::now(),
      updated_at:  Utc::now(),
    };
    state
      .log
      .log_activity(recorder::task_created(&task, "Maya Obi").unwrap())
      .await
      .unwrap();

    let expense = Expense {
      expense_id:   Uuid::new_v4(),
      project_id,
      title:        "Tile order".into(),
      expense_date: Utc::now(),
      category:     "Materials".into(),
      description:  "Porcelain floor tile".into(),
      amount:       120.50,
      status:       ExpenseStatus::Pending,
      created_at:   Utc::now(),
      updated_at:   Utc::now(),
    };
    state
      .log
      .log_activity(recorder::expense_added(&expense).unwrap())
      .await
      .unwrap();

    let item = InventoryItem {
      inventory_item_id: Uuid::new_v4(),
      project_id,
      name:              "Cement bags".into(),
      category:          InventoryCategory::Materials,
      total:             100.0,
      used:              20.0,
      remaining:         80.0,
      unit:              "bag".into(),
      unit_cost:         12.5,
      supplier:          "BuildCo".into(),
      status:            InventoryStatus::Pending,
    };
    state
      .log
      .log_activity(recorder::inventory_added(&item).unwrap())
      .await
      .unwrap();
  }

  // ── Projects ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_and_fetch_project() {
    let state = state().await;

    let (status, created) = request(
      state.clone(),
      "POST",
      "/projects",
      Some(json!({
        "admin_id":     Uuid::new_v4(),
        "title":        "Kitchen Remodel",
        "description":  "Full kitchen renovation",
        "limit_budget": 25000.0,
        "location":     "12 Elm St",
        "start_date":   "2026-01-01T00:00:00Z",
        "end_date":     "2026-03-01T00:00:00Z",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], json!("Kitchen Remodel"));
    assert_eq!(created["status"], json!("active"));

    let id = created["project_id"].as_str().unwrap();
    let (status, fetched) =
      request(state, "GET", &format!("/projects/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["project_id"], created["project_id"]);
  }

  #[tokio::test]
  async fn fetch_missing_project_returns_404() {
    let state = state().await;
    let (status, body) = request(
      state,
      "GET",
      &format!("/projects/{}", Uuid::new_v4()),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn link_client_is_idempotent_and_checks_project() {
    let state = state().await;
    let project = seed_project(&state, Uuid::new_v4()).await;
    let client = Uuid::new_v4();
    let uri = format!("/projects/{}/clients", project.project_id);
    let body = json!({ "client_id": client });

    let (status, _) =
      request(state.clone(), "POST", &uri, Some(body.clone())).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) =
      request(state.clone(), "POST", &uri, Some(body.clone())).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request(
      state,
      "POST",
      &format!("/projects/{}/clients", Uuid::new_v4()),
      Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── User feed ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn user_feed_requires_exactly_one_identity() {
    let state = state().await;

    let (status, _) = request(state.clone(), "GET", "/activities", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(
      state,
      "GET",
      &format!(
        "/activities?admin_id={}&client_id={}",
        Uuid::new_v4(),
        Uuid::new_v4()
      ),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn admin_feed_lists_all_categories() {
    let state = state().await;
    let admin = Uuid::new_v4();
    let project = seed_project(&state, admin).await;
    seed_activities(&state, project.project_id).await;

    let (status, body) = request(
      state,
      "GET",
      &format!("/activities?admin_id={admin}"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
  }

  #[tokio::test]
  async fn client_feed_excludes_expenses() {
    let state = state().await;
    let project = seed_project(&state, Uuid::new_v4()).await;
    let client = Uuid::new_v4();
    state
      .log
      .store()
      .link_client(project.project_id, client)
      .await
      .unwrap();
    seed_activities(&state, project.project_id).await;

    let (status, body) = request(
      state,
      "GET",
      &format!("/activities?client_id={client}"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let kinds: Vec<&str> = body
      .as_array()
      .unwrap()
      .iter()
      .map(|a| a["kind"].as_str().unwrap())
      .collect();
    assert_eq!(kinds.len(), 2);
    assert!(!kinds.iter().any(|k| k.starts_with("expense")));
  }

  #[tokio::test]
  async fn worker_feed_is_forbidden() {
    let state = state().await;
    let (status, body) = request(
      state,
      "GET",
      &format!("/activities?worker_id={}", Uuid::new_v4()),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn user_without_projects_gets_404() {
    let state = state().await;
    let (status, _) = request(
      state,
      "GET",
      &format!("/activities?client_id={}", Uuid::new_v4()),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn feed_narrows_by_kind() {
    let state = state().await;
    let admin = Uuid::new_v4();
    let project = seed_project(&state, admin).await;
    seed_activities(&state, project.project_id).await;

    let (status, body) = request(
      state,
      "GET",
      &format!("/activities?admin_id={admin}&kind=task_created"),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let feed = body.as_array().unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["kind"], json!("task_created"));
    assert!(feed[0]["metadata"]["title"].is_string());
  }

  // ── Project feed ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn project_feed_lists_everything_newest_first() {
    let state = state().await;
    let project = seed_project(&state, Uuid::new_v4()).await;
    seed_activities(&state, project.project_id).await;

    let (status, body) = request(
      state,
      "GET",
      &format!("/projects/{}/activities", project.project_id),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
  }

  #[tokio::test]
  async fn project_feed_missing_project_returns_404() {
    let state = state().await;
    let (status, _) = request(
      state,
      "GET",
      &format!("/projects/{}/activities", Uuid::new_v4()),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Read state ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn mark_read_is_idempotent() {
    let state = state().await;
    let admin = Uuid::new_v4();
    let project = seed_project(&state, admin).await;
    seed_activities(&state, project.project_id).await;

    let (_, feed) = request(
      state.clone(),
      "GET",
      &format!("/activities?admin_id={admin}"),
      None,
    )
    .await;
    let id = feed[0]["activity_id"].as_str().unwrap().to_owned();

    let uri = format!("/activities/{id}/read");
    let (status, body) = request(state.clone(), "PUT", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_read"], json!(true));

    let (status, body) = request(state, "PUT", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_read"], json!(true));
  }

  #[tokio::test]
  async fn mark_read_missing_activity_returns_404() {
    let state = state().await;
    let (status, _) = request(
      state,
      "PUT",
      &format!("/activities/{}/read", Uuid::new_v4()),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn read_all_then_404_when_nothing_is_unread() {
    let state = state().await;
    let project = seed_project(&state, Uuid::new_v4()).await;
    seed_activities(&state, project.project_id).await;
    let uri = format!("/projects/{}/activities/read_all", project.project_id);

    let (status, body) = request(state.clone(), "PUT", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, _) = request(state, "PUT", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
