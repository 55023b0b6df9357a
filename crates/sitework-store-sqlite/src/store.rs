//! [`SqliteStore`] — the SQLite implementation of [`ActivityStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use sitework_core::{
  activity::{Activity, ActivityKind},
  entity::{NewProject, Project},
  store::{ActivityFilter, ActivityStore},
};

use crate::{
  Error, Result,
  encode::{
    RawActivity, RawProject, encode_dt, encode_kind, encode_project_status,
    encode_uuid,
  },
  schema::SCHEMA,
};

const ACTIVITY_COLUMNS: &str = "activity_id, project_id, task_id, \
   expense_id, inventory_item_id, kind, title_project, is_read, created_at, \
   metadata";

const PROJECT_COLUMNS: &str = "project_id, admin_id, title, description, \
   limit_budget, location, status, start_date, end_date, created_at";

fn read_activity_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawActivity> {
  Ok(RawActivity {
    activity_id:       row.get(0)?,
    project_id:        row.get(1)?,
    task_id:           row.get(2)?,
    expense_id:        row.get(3)?,
    inventory_item_id: row.get(4)?,
    kind:              row.get(5)?,
    title_project:     row.get(6)?,
    is_read:           row.get(7)?,
    created_at:        row.get(8)?,
    metadata:          row.get(9)?,
  })
}

fn read_project_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawProject> {
  Ok(RawProject {
    project_id:   row.get(0)?,
    admin_id:     row.get(1)?,
    title:        row.get(2)?,
    description:  row.get(3)?,
    limit_budget: row.get(4)?,
    location:     row.get(5)?,
    status:       row.get(6)?,
    start_date:   row.get(7)?,
    end_date:     row.get(8)?,
    created_at:   row.get(9)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Sitework activity store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ActivityStore impl ──────────────────────────────────────────────────────

impl ActivityStore for SqliteStore {
  type Error = Error;

  // ── Projects ──────────────────────────────────────────────────────────────

  async fn add_project(&self, input: NewProject) -> Result<Project> {
    let project = Project {
      project_id:   Uuid::new_v4(),
      admin_id:     input.admin_id,
      title:        input.title,
      description:  input.description,
      limit_budget: input.limit_budget,
      location:     input.location,
      status:       input.status,
      start_date:   input.start_date,
      end_date:     input.end_date,
      created_at:   Utc::now(),
    };

    let id_str         = encode_uuid(project.project_id);
    let admin_str      = encode_uuid(project.admin_id);
    let title          = project.title.clone();
    let description    = project.description.clone();
    let limit_budget   = project.limit_budget;
    let location       = project.location.clone();
    let status_str     = encode_project_status(project.status).to_owned();
    let start_str      = encode_dt(project.start_date);
    let end_str        = encode_dt(project.end_date);
    let created_at_str = encode_dt(project.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO projects (
             project_id, admin_id, title, description, limit_budget,
             location, status, start_date, end_date, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            id_str,
            admin_str,
            title,
            description,
            limit_budget,
            location,
            status_str,
            start_str,
            end_str,
            created_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(project)
  }

  async fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawProject> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PROJECT_COLUMNS} FROM projects WHERE project_id = ?1"
              ),
              rusqlite::params![id_str],
              read_project_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProject::into_project).transpose()
  }

  async fn list_projects(&self, admin_id: Option<Uuid>) -> Result<Vec<Project>> {
    let admin_str = admin_id.map(encode_uuid);

    let raws: Vec<RawProject> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(admin) = admin_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE admin_id = ?1
             ORDER BY created_at DESC"
          ))?;
          stmt
            .query_map(rusqlite::params![admin], read_project_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC"
          ))?;
          stmt
            .query_map([], read_project_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProject::into_project).collect()
  }

  async fn delete_project(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM projects WHERE project_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(n > 0)
      })
      .await?;

    Ok(deleted)
  }

  async fn link_client(&self, project_id: Uuid, client_id: Uuid) -> Result<()> {
    let project_str = encode_uuid(project_id);
    let client_str  = encode_uuid(client_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO project_clients (project_id, client_id)
           VALUES (?1, ?2)",
          rusqlite::params![project_str, client_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn client_project_ids(&self, client_id: Uuid) -> Result<Vec<Uuid>> {
    let client_str = encode_uuid(client_id);

    let ids: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT project_id FROM project_clients WHERE client_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![client_str], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    ids
      .iter()
      .map(|s| Uuid::parse_str(s).map_err(Error::Uuid))
      .collect()
  }

  async fn admin_project_ids(&self, admin_id: Uuid) -> Result<Vec<Uuid>> {
    let admin_str = encode_uuid(admin_id);

    let ids: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt =
          conn.prepare("SELECT project_id FROM projects WHERE admin_id = ?1")?;
        let rows = stmt
          .query_map(rusqlite::params![admin_str], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    ids
      .iter()
      .map(|s| Uuid::parse_str(s).map_err(Error::Uuid))
      .collect()
  }

  // ── Activities ────────────────────────────────────────────────────────────

  async fn insert_activity(&self, activity: &Activity) -> Result<()> {
    let id_str         = encode_uuid(activity.activity_id);
    let project_str    = encode_uuid(activity.project_id);
    let task_str       = activity.task_id.map(encode_uuid);
    let expense_str    = activity.expense_id.map(encode_uuid);
    let item_str       = activity.inventory_item_id.map(encode_uuid);
    let kind_str       = encode_kind(activity.kind).to_owned();
    let title_project  = activity.title_project.clone();
    let is_read        = activity.is_read;
    let created_at_str = encode_dt(activity.created_at);
    let metadata_str   = activity.payload.to_metadata(activity.kind).to_string();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO activities (
             activity_id, project_id, task_id, expense_id, inventory_item_id,
             kind, title_project, is_read, created_at, metadata
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            id_str,
            project_str,
            task_str,
            expense_str,
            item_str,
            kind_str,
            title_project,
            is_read,
            created_at_str,
            metadata_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_activity(&self, id: Uuid) -> Result<Option<Activity>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawActivity> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ACTIVITY_COLUMNS} FROM activities
                 WHERE activity_id = ?1"
              ),
              rusqlite::params![id_str],
              read_activity_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawActivity::into_activity).transpose()
  }

  async fn list_activities(&self, filter: &ActivityFilter) -> Result<Vec<Activity>> {
    let project_strs: Vec<String> =
      filter.project_ids.iter().copied().map(encode_uuid).collect();
    let kind_strs: Option<Vec<String>> = filter.categories.as_ref().map(|cats| {
      ActivityKind::kinds_in(cats)
        .into_iter()
        .map(|k| k.as_str().to_owned())
        .collect()
    });
    let is_read = filter.is_read;
    let kind_str = filter.kind.map(|k| k.as_str().to_owned());

    let raws: Vec<RawActivity> = self
      .conn
      .call(move |conn| {
        // Build WHERE clause dynamically; all params bound as text.
        let mut conds: Vec<String> = vec![];
        let mut params: Vec<String> = vec![];

        if !project_strs.is_empty() {
          let placeholders =
            vec!["?"; project_strs.len()].join(", ");
          conds.push(format!("project_id IN ({placeholders})"));
          params.extend(project_strs);
        }
        if let Some(kinds) = kind_strs {
          let placeholders = vec!["?"; kinds.len()].join(", ");
          conds.push(format!("kind IN ({placeholders})"));
          params.extend(kinds);
        }
        if let Some(read) = is_read {
          conds.push("is_read = ?".to_owned());
          params.push(if read { "1".into() } else { "0".into() });
        }
        if let Some(kind) = kind_str {
          conds.push("kind = ?".to_owned());
          params.push(kind);
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT {ACTIVITY_COLUMNS} FROM activities
           {where_clause}
           ORDER BY created_at DESC"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), read_activity_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawActivity::into_activity).collect()
  }

  async fn set_read(&self, id: Uuid) -> Result<Option<Activity>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawActivity> = self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE activities SET is_read = 1 WHERE activity_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ACTIVITY_COLUMNS} FROM activities
                 WHERE activity_id = ?1"
              ),
              rusqlite::params![id_str],
              read_activity_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawActivity::into_activity).transpose()
  }

  async fn mark_all_read(&self, project_id: Uuid) -> Result<Vec<Activity>> {
    let project_str = encode_uuid(project_id);

    let raws: Vec<RawActivity> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let raws = {
          let mut stmt = tx.prepare(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities
             WHERE project_id = ?1 AND is_read = 0
             ORDER BY created_at DESC"
          ))?;
          stmt
            .query_map(rusqlite::params![project_str], read_activity_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        tx.execute(
          "UPDATE activities SET is_read = 1
           WHERE project_id = ?1 AND is_read = 0",
          rusqlite::params![project_str],
        )?;

        tx.commit()?;
        Ok(raws)
      })
      .await?;

    raws
      .into_iter()
      .map(|raw| {
        let mut activity = raw.into_activity()?;
        activity.is_read = true;
        Ok(activity)
      })
      .collect()
  }
}
