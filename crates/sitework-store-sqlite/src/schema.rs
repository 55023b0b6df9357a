//! SQL schema for the Sitework SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS projects (
    project_id   TEXT PRIMARY KEY,
    admin_id     TEXT NOT NULL,
    title        TEXT NOT NULL,
    description  TEXT NOT NULL,
    limit_budget REAL NOT NULL,
    location     TEXT NOT NULL,
    status       TEXT NOT NULL,   -- 'active' | 'inactive'
    start_date   TEXT NOT NULL,   -- ISO 8601 UTC
    end_date     TEXT NOT NULL,
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS project_clients (
    project_id TEXT NOT NULL REFERENCES projects(project_id) ON DELETE CASCADE,
    client_id  TEXT NOT NULL,
    PRIMARY KEY (project_id, client_id)
);

CREATE TABLE IF NOT EXISTS activities (
    activity_id       TEXT PRIMARY KEY,
    project_id        TEXT NOT NULL REFERENCES projects(project_id) ON DELETE CASCADE,
    task_id           TEXT,
    expense_id        TEXT,
    inventory_item_id TEXT,
    kind              TEXT NOT NULL,   -- e.g. 'task_created', 'expense_deleted'
    title_project     TEXT NOT NULL,   -- project title at recording time
    is_read           INTEGER NOT NULL DEFAULT 0,
    created_at        TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    metadata          TEXT NOT NULL,   -- JSON payload, shape keyed by kind
    -- At most one linkage id per row; deletion kinds carry none.
    CHECK ((task_id IS NOT NULL) + (expense_id IS NOT NULL)
         + (inventory_item_id IS NOT NULL) <= 1)
);

CREATE INDEX IF NOT EXISTS activities_project_idx ON activities(project_id);
CREATE INDEX IF NOT EXISTS activities_kind_idx    ON activities(kind);
CREATE INDEX IF NOT EXISTS activities_created_idx ON activities(created_at);
CREATE INDEX IF NOT EXISTS activities_unread_idx  ON activities(project_id, is_read);

PRAGMA user_version = 1;
";
