//! SQL schema for the dashboard SQLite store.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS dashboards (
    dashboard_id    TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    scope           TEXT NOT NULL,   -- 'DOMAIN' | 'USER'
    viewers         TEXT NOT NULL,   -- 'PUBLIC' | 'PRIVATE'
    version         INTEGER NOT NULL DEFAULT 1,
    schema_version  TEXT NOT NULL,
    layouts         TEXT NOT NULL DEFAULT '[]',
    options         TEXT NOT NULL DEFAULT '{}',
    settings        TEXT NOT NULL DEFAULT '{}',
    options_schema  TEXT NOT NULL DEFAULT '{}',
    labels          TEXT NOT NULL DEFAULT '[]',
    tags            TEXT NOT NULL DEFAULT '{}',
    domain_id       TEXT NOT NULL,
    workspace_id    TEXT,
    project_id      TEXT,
    user_id         TEXT,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

-- Snapshots are immutable; only INSERT and DELETE are issued.
-- No foreign key: versions may outlive their dashboard.
CREATE TABLE IF NOT EXISTS dashboard_versions (
    dashboard_id    TEXT NOT NULL,
    version         INTEGER NOT NULL,
    layouts         TEXT NOT NULL,
    options         TEXT NOT NULL,
    settings        TEXT NOT NULL,
    options_schema  TEXT NOT NULL,
    domain_id       TEXT NOT NULL,
    created_at      TEXT NOT NULL,
    PRIMARY KEY (dashboard_id, version)
);

CREATE TABLE IF NOT EXISTS widgets (
    widget_id       TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    description     TEXT,
    widget_type     TEXT NOT NULL,
    options         TEXT,            -- JSON object or NULL
    tags            TEXT NOT NULL DEFAULT '{}',
    dashboard_id    TEXT NOT NULL,
    data_table_id   TEXT,
    visibility      TEXT NOT NULL,
    domain_id       TEXT NOT NULL,
    workspace_id    TEXT,
    project_id      TEXT,
    user_id         TEXT,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS data_tables (
    data_table_id   TEXT PRIMARY KEY,
    name            TEXT,
    state           TEXT NOT NULL,   -- 'AVAILABLE' | 'UNAVAILABLE'
    error_message   TEXT,
    data_type       TEXT NOT NULL,   -- 'ADDED' | 'TRANSFORMED'
    source_type     TEXT,
    operator        TEXT,
    options         TEXT NOT NULL DEFAULT '{}',
    tags            TEXT NOT NULL DEFAULT '{}',
    labels_info     TEXT,
    data_info       TEXT,
    dashboard_id    TEXT NOT NULL,
    widget_id       TEXT NOT NULL,
    visibility      TEXT NOT NULL,
    domain_id       TEXT NOT NULL,
    workspace_id    TEXT,
    project_id      TEXT,
    user_id         TEXT,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS dashboards_domain_idx  ON dashboards(domain_id);
CREATE INDEX IF NOT EXISTS widgets_dashboard_idx  ON widgets(dashboard_id);
CREATE INDEX IF NOT EXISTS data_tables_widget_idx ON data_tables(widget_id);

PRAGMA user_version = 1;
";
