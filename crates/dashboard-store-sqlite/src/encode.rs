//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Structured fields (layouts,
//! options, settings, tags and friends) are stored as compact JSON. Enums are
//! stored as their upper-case names.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use dashboard_core::{
  dashboard::{Dashboard, DashboardScope, DashboardVersion},
  data_table::{DataTable, DataTableState, DataType},
  ownership::{Ownership, Visibility},
  widget::Widget,
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

// ─── JSON ────────────────────────────────────────────────────────────────────

pub fn encode_json<T: Serialize>(value: &T) -> Result<String> {
  Ok(serde_json::to_string(value)?)
}

pub fn decode_json<T: DeserializeOwned>(s: &str) -> Result<T> {
  Ok(serde_json::from_str(s)?)
}

pub fn decode_json_opt<T: DeserializeOwned>(s: Option<&str>) -> Result<Option<T>> {
  s.map(decode_json).transpose()
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn decode_enum<T: FromStr>(kind: &'static str, s: &str) -> Result<T> {
  s.parse().map_err(|_| {
    Error::Core(dashboard_core::Error::UnknownVariant {
      kind,
      value: s.to_owned(),
    })
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawDashboard::from_row`].
pub const DASHBOARD_COLUMNS: &str = "dashboard_id, name, scope, viewers, \
  version, schema_version, layouts, options, settings, options_schema, \
  labels, tags, domain_id, workspace_id, project_id, user_id, created_at, \
  updated_at";

/// Raw values read directly from a `dashboards` row.
pub struct RawDashboard {
  pub dashboard_id:   String,
  pub name:           String,
  pub scope:          String,
  pub viewers:        String,
  pub version:        u32,
  pub schema_version: String,
  pub layouts:        String,
  pub options:        String,
  pub settings:       String,
  pub options_schema: String,
  pub labels:         String,
  pub tags:           String,
  pub domain_id:      String,
  pub workspace_id:   Option<String>,
  pub project_id:     Option<String>,
  pub user_id:        Option<String>,
  pub created_at:     String,
  pub updated_at:     String,
}

impl RawDashboard {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      dashboard_id:   row.get(0)?,
      name:           row.get(1)?,
      scope:          row.get(2)?,
      viewers:        row.get(3)?,
      version:        row.get(4)?,
      schema_version: row.get(5)?,
      layouts:        row.get(6)?,
      options:        row.get(7)?,
      settings:       row.get(8)?,
      options_schema: row.get(9)?,
      labels:         row.get(10)?,
      tags:           row.get(11)?,
      domain_id:      row.get(12)?,
      workspace_id:   row.get(13)?,
      project_id:     row.get(14)?,
      user_id:        row.get(15)?,
      created_at:     row.get(16)?,
      updated_at:     row.get(17)?,
    })
  }

  pub fn into_dashboard(self) -> Result<Dashboard> {
    Ok(Dashboard {
      dashboard_id:   self.dashboard_id,
      name:           self.name,
      scope:          decode_enum::<DashboardScope>("scope", &self.scope)?,
      viewers:        decode_enum::<Visibility>("viewers", &self.viewers)?,
      version:        self.version,
      schema_version: self.schema_version,
      layouts:        decode_json(&self.layouts)?,
      options:        decode_json(&self.options)?,
      settings:       decode_json(&self.settings)?,
      options_schema: decode_json(&self.options_schema)?,
      labels:         decode_json(&self.labels)?,
      tags:           decode_json(&self.tags)?,
      owner:          Ownership {
        domain_id:    self.domain_id,
        workspace_id: self.workspace_id,
        project_id:   self.project_id,
        user_id:      self.user_id,
      },
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
    })
  }
}

/// Column list matching [`RawVersion::from_row`].
pub const VERSION_COLUMNS: &str = "dashboard_id, version, layouts, options, \
  settings, options_schema, domain_id, created_at";

/// Raw values read directly from a `dashboard_versions` row.
pub struct RawVersion {
  pub dashboard_id:   String,
  pub version:        u32,
  pub layouts:        String,
  pub options:        String,
  pub settings:       String,
  pub options_schema: String,
  pub domain_id:      String,
  pub created_at:     String,
}

impl RawVersion {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      dashboard_id:   row.get(0)?,
      version:        row.get(1)?,
      layouts:        row.get(2)?,
      options:        row.get(3)?,
      settings:       row.get(4)?,
      options_schema: row.get(5)?,
      domain_id:      row.get(6)?,
      created_at:     row.get(7)?,
    })
  }

  pub fn into_version(self) -> Result<DashboardVersion> {
    Ok(DashboardVersion {
      dashboard_id:   self.dashboard_id,
      version:        self.version,
      layouts:        decode_json(&self.layouts)?,
      options:        decode_json(&self.options)?,
      settings:       decode_json(&self.settings)?,
      options_schema: decode_json(&self.options_schema)?,
      domain_id:      self.domain_id,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

/// Column list matching [`RawWidget::from_row`].
pub const WIDGET_COLUMNS: &str = "widget_id, name, description, widget_type, \
  options, tags, dashboard_id, data_table_id, visibility, domain_id, \
  workspace_id, project_id, user_id, created_at, updated_at";

/// Raw values read directly from a `widgets` row.
pub struct RawWidget {
  pub widget_id:     String,
  pub name:          String,
  pub description:   Option<String>,
  pub widget_type:   String,
  pub options:       Option<String>,
  pub tags:          String,
  pub dashboard_id:  String,
  pub data_table_id: Option<String>,
  pub visibility:    String,
  pub domain_id:     String,
  pub workspace_id:  Option<String>,
  pub project_id:    Option<String>,
  pub user_id:       Option<String>,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawWidget {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      widget_id:     row.get(0)?,
      name:          row.get(1)?,
      description:   row.get(2)?,
      widget_type:   row.get(3)?,
      options:       row.get(4)?,
      tags:          row.get(5)?,
      dashboard_id:  row.get(6)?,
      data_table_id: row.get(7)?,
      visibility:    row.get(8)?,
      domain_id:     row.get(9)?,
      workspace_id:  row.get(10)?,
      project_id:    row.get(11)?,
      user_id:       row.get(12)?,
      created_at:    row.get(13)?,
      updated_at:    row.get(14)?,
    })
  }

  pub fn into_widget(self) -> Result<Widget> {
    Ok(Widget {
      widget_id:     self.widget_id,
      name:          self.name,
      description:   self.description,
      widget_type:   self.widget_type,
      options:       decode_json_opt(self.options.as_deref())?,
      tags:          decode_json(&self.tags)?,
      dashboard_id:  self.dashboard_id,
      data_table_id: self.data_table_id,
      visibility:    decode_enum::<Visibility>("visibility", &self.visibility)?,
      owner:         Ownership {
        domain_id:    self.domain_id,
        workspace_id: self.workspace_id,
        project_id:   self.project_id,
        user_id:      self.user_id,
      },
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

/// Column list matching [`RawDataTable::from_row`].
pub const DATA_TABLE_COLUMNS: &str = "data_table_id, name, state, \
  error_message, data_type, source_type, operator, options, tags, \
  labels_info, data_info, dashboard_id, widget_id, visibility, domain_id, \
  workspace_id, project_id, user_id, created_at, updated_at";

/// Raw values read directly from a `data_tables` row.
pub struct RawDataTable {
  pub data_table_id: String,
  pub name:          Option<String>,
  pub state:         String,
  pub error_message: Option<String>,
  pub data_type:     String,
  pub source_type:   Option<String>,
  pub operator:      Option<String>,
  pub options:       String,
  pub tags:          String,
  pub labels_info:   Option<String>,
  pub data_info:     Option<String>,
  pub dashboard_id:  String,
  pub widget_id:     String,
  pub visibility:    String,
  pub domain_id:     String,
  pub workspace_id:  Option<String>,
  pub project_id:    Option<String>,
  pub user_id:       Option<String>,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawDataTable {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      data_table_id: row.get(0)?,
      name:          row.get(1)?,
      state:         row.get(2)?,
      error_message: row.get(3)?,
      data_type:     row.get(4)?,
      source_type:   row.get(5)?,
      operator:      row.get(6)?,
      options:       row.get(7)?,
      tags:          row.get(8)?,
      labels_info:   row.get(9)?,
      data_info:     row.get(10)?,
      dashboard_id:  row.get(11)?,
      widget_id:     row.get(12)?,
      visibility:    row.get(13)?,
      domain_id:     row.get(14)?,
      workspace_id:  row.get(15)?,
      project_id:    row.get(16)?,
      user_id:       row.get(17)?,
      created_at:    row.get(18)?,
      updated_at:    row.get(19)?,
    })
  }

  pub fn into_data_table(self) -> Result<DataTable> {
    Ok(DataTable {
      data_table_id: self.data_table_id,
      name:          self.name,
      state:         decode_enum::<DataTableState>("state", &self.state)?,
      error_message: self.error_message,
      data_type:     decode_enum::<DataType>("data_type", &self.data_type)?,
      source_type:   self.source_type,
      operator:      self.operator,
      options:       decode_json(&self.options)?,
      tags:          decode_json(&self.tags)?,
      labels_info:   decode_json_opt(self.labels_info.as_deref())?,
      data_info:     decode_json_opt(self.data_info.as_deref())?,
      dashboard_id:  self.dashboard_id,
      widget_id:     self.widget_id,
      visibility:    decode_enum::<Visibility>("visibility", &self.visibility)?,
      owner:         Ownership {
        domain_id:    self.domain_id,
        workspace_id: self.workspace_id,
        project_id:   self.project_id,
        user_id:      self.user_id,
      },
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unknown_enum_names_are_rejected() {
    let err = decode_enum::<Visibility>("visibility", "SHARED").unwrap_err();
    assert!(err.to_string().contains("SHARED"));
    assert_eq!(
      decode_enum::<Visibility>("visibility", "PRIVATE").unwrap(),
      Visibility::Private,
    );
  }

  #[test]
  fn bad_timestamps_are_decode_errors() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::Decode(_))));
  }
}
