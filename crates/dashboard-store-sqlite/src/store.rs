//! [`SqliteStore`], the SQLite implementation of the repository traits.

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, types::Value};

use dashboard_core::{
  dashboard::{Dashboard, DashboardPatch, DashboardVersion, NewDashboard, NewVersion},
  data_table::{DataTable, DataTablePatch, DataTableState, NewDataTable},
  id::{
    DASHBOARD_PREFIX, PRIVATE_DATA_TABLE_PREFIX, PRIVATE_WIDGET_PREFIX,
    PUBLIC_DATA_TABLE_PREFIX, PUBLIC_WIDGET_PREFIX, generate_id,
  },
  ownership::{Access, Visibility},
  query::{
    DashboardFilter, DashboardQuery, DataTableQuery, ListResult, StatBucket,
    StatField, StatQuery, VersionQuery, WidgetQuery,
  },
  store::{
    DashboardRepository, DataTableRepository, Store, VersionRepository,
    WidgetRepository,
  },
  widget::{NewWidget, Widget, WidgetPatch},
};

use crate::{
  Result,
  encode::{
    DASHBOARD_COLUMNS, DATA_TABLE_COLUMNS, RawDashboard, RawDataTable,
    RawVersion, RawWidget, VERSION_COLUMNS, WIDGET_COLUMNS, encode_dt,
    encode_json,
  },
  filter::{Conditions, page_params},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Dashboard repositories backed by a single SQLite file.
///
/// Cloning shares the inner connection.
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

  /// Open an in-memory store.
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

  /// Run a single-statement write and return the number of affected rows.
  async fn execute(&self, sql: &'static str, params: Vec<Value>) -> Result<usize> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(sql, rusqlite::params_from_iter(params))?)
      })
      .await?;
    Ok(changed)
  }

  /// Select every row matching `conds`, mapped through `map`.
  async fn select<R>(
    &self,
    table: &'static str,
    columns: &'static str,
    conds: Conditions,
    map: fn(&rusqlite::Row<'_>) -> rusqlite::Result<R>,
  ) -> Result<Vec<R>>
  where
    R: Send + 'static,
  {
    let sql = format!("SELECT {columns} FROM {table} {}", conds.where_clause());
    let params = conds.into_params();

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), map)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Count matches, then fetch one ordered page of them.
  async fn page<R>(
    &self,
    table: &'static str,
    columns: &'static str,
    conds: Conditions,
    order_by: &'static str,
    (limit, offset): (Option<usize>, Option<usize>),
    map: fn(&rusqlite::Row<'_>) -> rusqlite::Result<R>,
  ) -> Result<(Vec<R>, u64)>
  where
    R: Send + 'static,
  {
    let where_clause = conds.where_clause();
    let count_sql = format!("SELECT COUNT(*) FROM {table} {where_clause}");
    let page_sql = format!(
      "SELECT {columns} FROM {table} {where_clause}
       ORDER BY {order_by}
       LIMIT ? OFFSET ?"
    );
    let params = conds.into_params();
    let mut page_params_all = params.clone();
    page_params_all.extend(page_params(limit, offset));

    let (rows, total) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          &count_sql,
          rusqlite::params_from_iter(params),
          |r| r.get(0),
        )?;
        let mut stmt = conn.prepare(&page_sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(page_params_all), map)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((rows, total))
      })
      .await?;

    Ok((rows, u64::try_from(total).unwrap_or_default()))
  }

  async fn fetch_dashboard(&self, dashboard_id: &str) -> Result<Option<Dashboard>> {
    let mut conds = Conditions::new();
    conds.eq("dashboard_id", Some(dashboard_id.to_owned()));
    self
      .select("dashboards", DASHBOARD_COLUMNS, conds, RawDashboard::from_row)
      .await?
      .into_iter()
      .next()
      .map(RawDashboard::into_dashboard)
      .transpose()
  }

  async fn fetch_widget(&self, widget_id: &str) -> Result<Option<Widget>> {
    let mut conds = Conditions::new();
    conds.eq("widget_id", Some(widget_id.to_owned()));
    self
      .select("widgets", WIDGET_COLUMNS, conds, RawWidget::from_row)
      .await?
      .into_iter()
      .next()
      .map(RawWidget::into_widget)
      .transpose()
  }

  async fn fetch_data_table(&self, data_table_id: &str) -> Result<Option<DataTable>> {
    let mut conds = Conditions::new();
    conds.eq("data_table_id", Some(data_table_id.to_owned()));
    self
      .select("data_tables", DATA_TABLE_COLUMNS, conds, RawDataTable::from_row)
      .await?
      .into_iter()
      .next()
      .map(RawDataTable::into_data_table)
      .transpose()
  }
}

fn text(s: impl Into<String>) -> Value { Value::Text(s.into()) }

fn opt_text(s: Option<String>) -> Value { s.map_or(Value::Null, Value::Text) }

fn dashboard_conditions(filter: &DashboardFilter, keyword: Option<&str>, access: &Access) -> Conditions {
  let mut conds = Conditions::new();
  conds
    .access("viewers", access)
    .eq("dashboard_id", filter.dashboard_id.clone())
    .eq("name", filter.name.clone())
    .eq("scope", filter.scope.map(|s| s.as_ref().to_owned()))
    .eq("user_id", filter.user_id.clone())
    .eq("project_id", filter.project_id.clone())
    .keyword(&["dashboard_id", "name"], keyword);
  conds
}

/// Column expression grouped on by a dashboard statistics query.
fn stat_column(field: StatField) -> &'static str {
  match field {
    StatField::Scope => "scope",
    StatField::Viewers => "viewers",
    StatField::Version => "CAST(version AS TEXT)",
    StatField::SchemaVersion => "schema_version",
    StatField::UserId => "user_id",
    StatField::WorkspaceId => "workspace_id",
    StatField::ProjectId => "project_id",
  }
}

impl Store for SqliteStore {
  type Error = crate::Error;
}

// ─── Dashboards ──────────────────────────────────────────────────────────────

impl DashboardRepository for SqliteStore {
  async fn create_dashboard(&self, input: NewDashboard) -> Result<Dashboard> {
    let now = Utc::now();
    let dashboard = Dashboard {
      dashboard_id:   generate_id(DASHBOARD_PREFIX),
      name:           input.name,
      scope:          input.scope,
      viewers:        input.scope.visibility(),
      version:        1,
      schema_version: input.schema_version,
      layouts:        input.layouts,
      options:        input.options,
      settings:       input.settings,
      options_schema: input.options_schema,
      labels:         input.labels,
      tags:           input.tags,
      owner:          input.owner,
      created_at:     now,
      updated_at:     now,
    };

    let params = vec![
      text(&dashboard.dashboard_id),
      text(&dashboard.name),
      text(dashboard.scope.as_ref()),
      text(dashboard.viewers.as_ref()),
      Value::Integer(i64::from(dashboard.version)),
      text(&dashboard.schema_version),
      text(encode_json(&dashboard.layouts)?),
      text(encode_json(&dashboard.options)?),
      text(encode_json(&dashboard.settings)?),
      text(encode_json(&dashboard.options_schema)?),
      text(encode_json(&dashboard.labels)?),
      text(encode_json(&dashboard.tags)?),
      text(&dashboard.owner.domain_id),
      opt_text(dashboard.owner.workspace_id.clone()),
      opt_text(dashboard.owner.project_id.clone()),
      opt_text(dashboard.owner.user_id.clone()),
      text(encode_dt(dashboard.created_at)),
      text(encode_dt(dashboard.updated_at)),
    ];

    self
      .execute(
        "INSERT INTO dashboards (
           dashboard_id, name, scope, viewers, version, schema_version,
           layouts, options, settings, options_schema, labels, tags,
           domain_id, workspace_id, project_id, user_id, created_at, updated_at
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params,
      )
      .await?;

    Ok(dashboard)
  }

  async fn get_dashboard(
    &self,
    dashboard_id: &str,
    access: &Access,
  ) -> Result<Option<Dashboard>> {
    let filter = DashboardFilter {
      dashboard_id: Some(dashboard_id.to_owned()),
      ..Default::default()
    };
    let conds = dashboard_conditions(&filter, None, access);
    self
      .select("dashboards", DASHBOARD_COLUMNS, conds, RawDashboard::from_row)
      .await?
      .into_iter()
      .next()
      .map(RawDashboard::into_dashboard)
      .transpose()
  }

  async fn list_dashboards(
    &self,
    query: &DashboardQuery,
    access: &Access,
  ) -> Result<ListResult<Dashboard>> {
    let conds = dashboard_conditions(&query.filter, query.keyword.as_deref(), access);
    let (raws, total_count) = self
      .page(
        "dashboards",
        DASHBOARD_COLUMNS,
        conds,
        "name, dashboard_id",
        (query.limit, query.offset),
        RawDashboard::from_row,
      )
      .await?;

    Ok(ListResult {
      results: raws
        .into_iter()
        .map(RawDashboard::into_dashboard)
        .collect::<Result<_>>()?,
      total_count,
    })
  }

  async fn stat_dashboards(
    &self,
    query: &StatQuery,
    access: &Access,
  ) -> Result<Vec<StatBucket>> {
    let conds = dashboard_conditions(&query.filter, query.keyword.as_deref(), access);
    let column = stat_column(query.group_by);
    let sql = format!(
      "SELECT {column} AS stat_key, COUNT(*) FROM dashboards {}
       GROUP BY stat_key
       ORDER BY stat_key",
      conds.where_clause()
    );
    let params = conds.into_params();

    let rows: Vec<(Option<String>, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), |r| {
            Ok((r.get(0)?, r.get(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      rows
        .into_iter()
        .map(|(key, count)| StatBucket {
          key,
          count: u64::try_from(count).unwrap_or_default(),
        })
        .collect(),
    )
  }

  async fn update_dashboard(
    &self,
    dashboard_id: &str,
    patch: DashboardPatch,
  ) -> Result<Option<Dashboard>> {
    let Some(mut dashboard) = self.fetch_dashboard(dashboard_id).await? else {
      return Ok(None);
    };
    patch.apply(&mut dashboard);
    dashboard.updated_at = Utc::now();

    let params = vec![
      text(&dashboard.name),
      text(encode_json(&dashboard.layouts)?),
      text(encode_json(&dashboard.options)?),
      text(encode_json(&dashboard.settings)?),
      text(encode_json(&dashboard.options_schema)?),
      text(encode_json(&dashboard.labels)?),
      text(encode_json(&dashboard.tags)?),
      text(encode_dt(dashboard.updated_at)),
      text(&dashboard.dashboard_id),
    ];

    self
      .execute(
        "UPDATE dashboards SET
           name = ?, layouts = ?, options = ?, settings = ?,
           options_schema = ?, labels = ?, tags = ?, updated_at = ?
         WHERE dashboard_id = ?",
        params,
      )
      .await?;

    Ok(Some(dashboard))
  }

  async fn increment_version(&self, dashboard_id: &str) -> Result<Option<Dashboard>> {
    let changed = self
      .execute(
        "UPDATE dashboards SET version = version + 1 WHERE dashboard_id = ?",
        vec![text(dashboard_id)],
      )
      .await?;
    if changed == 0 {
      return Ok(None);
    }
    self.fetch_dashboard(dashboard_id).await
  }

  async fn delete_dashboard(&self, dashboard_id: &str) -> Result<bool> {
    let changed = self
      .execute(
        "DELETE FROM dashboards WHERE dashboard_id = ?",
        vec![text(dashboard_id)],
      )
      .await?;
    Ok(changed > 0)
  }
}

// ─── Versions ────────────────────────────────────────────────────────────────

impl VersionRepository for SqliteStore {
  async fn create_version(&self, input: NewVersion) -> Result<DashboardVersion> {
    let version = DashboardVersion {
      dashboard_id:   input.dashboard_id,
      version:        input.version,
      layouts:        input.layouts,
      options:        input.options,
      settings:       input.settings,
      options_schema: input.options_schema,
      domain_id:      input.domain_id,
      created_at:     Utc::now(),
    };

    let params = vec![
      text(&version.dashboard_id),
      Value::Integer(i64::from(version.version)),
      text(encode_json(&version.layouts)?),
      text(encode_json(&version.options)?),
      text(encode_json(&version.settings)?),
      text(encode_json(&version.options_schema)?),
      text(&version.domain_id),
      text(encode_dt(version.created_at)),
    ];

    self
      .execute(
        "INSERT INTO dashboard_versions (
           dashboard_id, version, layouts, options, settings,
           options_schema, domain_id, created_at
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        params,
      )
      .await?;

    Ok(version)
  }

  async fn get_version(
    &self,
    dashboard_id: &str,
    version: u32,
    domain_id: &str,
  ) -> Result<Option<DashboardVersion>> {
    let dashboard_id = dashboard_id.to_owned();
    let domain_id = domain_id.to_owned();

    let raw: Option<RawVersion> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {VERSION_COLUMNS} FROM dashboard_versions
                 WHERE dashboard_id = ?1 AND version = ?2 AND domain_id = ?3"
              ),
              rusqlite::params![dashboard_id, version, domain_id],
              RawVersion::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawVersion::into_version).transpose()
  }

  async fn list_versions(
    &self,
    query: &VersionQuery,
    domain_id: &str,
  ) -> Result<ListResult<DashboardVersion>> {
    let mut conds = Conditions::new();
    conds
      .eq("dashboard_id", Some(query.filter.dashboard_id.clone()))
      .eq("domain_id", Some(domain_id.to_owned()))
      .eq("version", query.filter.version.map(i64::from))
      .keyword(
        &["dashboard_id", "CAST(version AS TEXT)"],
        query.keyword.as_deref(),
      );

    let (raws, total_count) = self
      .page(
        "dashboard_versions",
        VERSION_COLUMNS,
        conds,
        "version DESC",
        (query.limit, query.offset),
        RawVersion::from_row,
      )
      .await?;

    Ok(ListResult {
      results: raws
        .into_iter()
        .map(RawVersion::into_version)
        .collect::<Result<_>>()?,
      total_count,
    })
  }

  async fn delete_version(
    &self,
    dashboard_id: &str,
    version: u32,
    domain_id: &str,
  ) -> Result<bool> {
    let changed = self
      .execute(
        "DELETE FROM dashboard_versions
         WHERE dashboard_id = ? AND version = ? AND domain_id = ?",
        vec![
          text(dashboard_id),
          Value::Integer(i64::from(version)),
          text(domain_id),
        ],
      )
      .await?;
    Ok(changed > 0)
  }
}

// ─── Widgets ─────────────────────────────────────────────────────────────────

impl WidgetRepository for SqliteStore {
  async fn create_widget(&self, input: NewWidget) -> Result<Widget> {
    let prefix = match input.visibility {
      Visibility::Private => PRIVATE_WIDGET_PREFIX,
      Visibility::Public => PUBLIC_WIDGET_PREFIX,
    };
    let now = Utc::now();
    let widget = Widget {
      widget_id:     generate_id(prefix),
      name:          input.name,
      description:   input.description,
      widget_type:   input.widget_type,
      options:       input.options,
      tags:          input.tags,
      dashboard_id:  input.dashboard_id,
      data_table_id: None,
      visibility:    input.visibility,
      owner:         input.owner,
      created_at:    now,
      updated_at:    now,
    };

    let options = widget.options.as_ref().map(encode_json).transpose()?;
    let params = vec![
      text(&widget.widget_id),
      text(&widget.name),
      opt_text(widget.description.clone()),
      text(&widget.widget_type),
      opt_text(options),
      text(encode_json(&widget.tags)?),
      text(&widget.dashboard_id),
      opt_text(widget.data_table_id.clone()),
      text(widget.visibility.as_ref()),
      text(&widget.owner.domain_id),
      opt_text(widget.owner.workspace_id.clone()),
      opt_text(widget.owner.project_id.clone()),
      opt_text(widget.owner.user_id.clone()),
      text(encode_dt(widget.created_at)),
      text(encode_dt(widget.updated_at)),
    ];

    self
      .execute(
        "INSERT INTO widgets (
           widget_id, name, description, widget_type, options, tags,
           dashboard_id, data_table_id, visibility, domain_id, workspace_id,
           project_id, user_id, created_at, updated_at
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params,
      )
      .await?;

    Ok(widget)
  }

  async fn get_widget(&self, widget_id: &str, access: &Access) -> Result<Option<Widget>> {
    let mut conds = Conditions::new();
    conds
      .access("visibility", access)
      .eq("widget_id", Some(widget_id.to_owned()));
    self
      .select("widgets", WIDGET_COLUMNS, conds, RawWidget::from_row)
      .await?
      .into_iter()
      .next()
      .map(RawWidget::into_widget)
      .transpose()
  }

  async fn list_widgets(
    &self,
    query: &WidgetQuery,
    access: &Access,
  ) -> Result<ListResult<Widget>> {
    let mut conds = Conditions::new();
    conds
      .access("visibility", access)
      .eq("dashboard_id", query.filter.dashboard_id.clone())
      .eq("widget_id", query.filter.widget_id.clone())
      .eq("name", query.filter.name.clone())
      .keyword(&["widget_id", "name"], query.keyword.as_deref());

    let (raws, total_count) = self
      .page(
        "widgets",
        WIDGET_COLUMNS,
        conds,
        "name, widget_id",
        (query.limit, query.offset),
        RawWidget::from_row,
      )
      .await?;

    Ok(ListResult {
      results: raws
        .into_iter()
        .map(RawWidget::into_widget)
        .collect::<Result<_>>()?,
      total_count,
    })
  }

  async fn update_widget(
    &self,
    widget_id: &str,
    patch: WidgetPatch,
  ) -> Result<Option<Widget>> {
    let Some(mut widget) = self.fetch_widget(widget_id).await? else {
      return Ok(None);
    };
    patch.apply(&mut widget);
    widget.updated_at = Utc::now();

    let options = widget.options.as_ref().map(encode_json).transpose()?;
    let params = vec![
      text(&widget.name),
      opt_text(widget.description.clone()),
      text(&widget.widget_type),
      opt_text(options),
      opt_text(widget.data_table_id.clone()),
      text(encode_json(&widget.tags)?),
      text(encode_dt(widget.updated_at)),
      text(&widget.widget_id),
    ];

    self
      .execute(
        "UPDATE widgets SET
           name = ?, description = ?, widget_type = ?, options = ?,
           data_table_id = ?, tags = ?, updated_at = ?
         WHERE widget_id = ?",
        params,
      )
      .await?;

    Ok(Some(widget))
  }

  async fn delete_widget(&self, widget_id: &str) -> Result<bool> {
    let changed = self
      .execute("DELETE FROM widgets WHERE widget_id = ?", vec![text(widget_id)])
      .await?;
    Ok(changed > 0)
  }
}

// ─── Data tables ─────────────────────────────────────────────────────────────

impl DataTableRepository for SqliteStore {
  async fn create_data_table(&self, input: NewDataTable) -> Result<DataTable> {
    let prefix = match input.visibility {
      Visibility::Private => PRIVATE_DATA_TABLE_PREFIX,
      Visibility::Public => PUBLIC_DATA_TABLE_PREFIX,
    };
    let now = Utc::now();
    let table = DataTable {
      data_table_id: generate_id(prefix),
      name:          input.name,
      state:         DataTableState::Available,
      error_message: None,
      data_type:     input.data_type,
      source_type:   input.source_type,
      operator:      input.operator,
      options:       input.options,
      tags:          input.tags,
      labels_info:   None,
      data_info:     None,
      dashboard_id:  input.dashboard_id,
      widget_id:     input.widget_id,
      visibility:    input.visibility,
      owner:         input.owner,
      created_at:    now,
      updated_at:    now,
    };

    let params = vec![
      text(&table.data_table_id),
      opt_text(table.name.clone()),
      text(table.state.as_ref()),
      text(table.data_type.as_ref()),
      opt_text(table.source_type.clone()),
      opt_text(table.operator.clone()),
      text(encode_json(&table.options)?),
      text(encode_json(&table.tags)?),
      text(&table.dashboard_id),
      text(&table.widget_id),
      text(table.visibility.as_ref()),
      text(&table.owner.domain_id),
      opt_text(table.owner.workspace_id.clone()),
      opt_text(table.owner.project_id.clone()),
      opt_text(table.owner.user_id.clone()),
      text(encode_dt(table.created_at)),
      text(encode_dt(table.updated_at)),
    ];

    self
      .execute(
        "INSERT INTO data_tables (
           data_table_id, name, state, data_type, source_type, operator,
           options, tags, dashboard_id, widget_id, visibility, domain_id,
           workspace_id, project_id, user_id, created_at, updated_at
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params,
      )
      .await?;

    Ok(table)
  }

  async fn get_data_table(
    &self,
    data_table_id: &str,
    access: &Access,
  ) -> Result<Option<DataTable>> {
    let mut conds = Conditions::new();
    conds
      .access("visibility", access)
      .eq("data_table_id", Some(data_table_id.to_owned()));
    self
      .select("data_tables", DATA_TABLE_COLUMNS, conds, RawDataTable::from_row)
      .await?
      .into_iter()
      .next()
      .map(RawDataTable::into_data_table)
      .transpose()
  }

  async fn list_data_tables(
    &self,
    query: &DataTableQuery,
    access: &Access,
  ) -> Result<ListResult<DataTable>> {
    let filter = &query.filter;
    let mut conds = Conditions::new();
    conds
      .access("visibility", access)
      .eq("widget_id", filter.widget_id.clone())
      .eq("data_table_id", filter.data_table_id.clone())
      .eq("name", filter.name.clone())
      .eq("data_type", filter.data_type.map(|t| t.as_ref().to_owned()))
      .eq("source_type", filter.source_type.clone())
      .eq("operator", filter.operator.clone())
      .keyword(&["data_table_id", "name"], query.keyword.as_deref());

    let (raws, total_count) = self
      .page(
        "data_tables",
        DATA_TABLE_COLUMNS,
        conds,
        "name, data_table_id",
        (query.limit, query.offset),
        RawDataTable::from_row,
      )
      .await?;

    Ok(ListResult {
      results: raws
        .into_iter()
        .map(RawDataTable::into_data_table)
        .collect::<Result<_>>()?,
      total_count,
    })
  }

  async fn update_data_table(
    &self,
    data_table_id: &str,
    patch: DataTablePatch,
  ) -> Result<Option<DataTable>> {
    let Some(mut table) = self.fetch_data_table(data_table_id).await? else {
      return Ok(None);
    };
    patch.apply(&mut table);
    table.updated_at = Utc::now();

    let labels_info = table.labels_info.as_ref().map(encode_json).transpose()?;
    let data_info = table.data_info.as_ref().map(encode_json).transpose()?;
    let params = vec![
      opt_text(table.name.clone()),
      text(table.state.as_ref()),
      opt_text(table.error_message.clone()),
      text(encode_json(&table.options)?),
      text(encode_json(&table.tags)?),
      opt_text(labels_info),
      opt_text(data_info),
      text(encode_dt(table.updated_at)),
      text(&table.data_table_id),
    ];

    self
      .execute(
        "UPDATE data_tables SET
           name = ?, state = ?, error_message = ?, options = ?, tags = ?,
           labels_info = ?, data_info = ?, updated_at = ?
         WHERE data_table_id = ?",
        params,
      )
      .await?;

    Ok(Some(table))
  }

  async fn delete_data_table(&self, data_table_id: &str) -> Result<bool> {
    let changed = self
      .execute(
        "DELETE FROM data_tables WHERE data_table_id = ?",
        vec![text(data_table_id)],
      )
      .await?;
    Ok(changed > 0)
  }
}
