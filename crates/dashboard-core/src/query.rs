//! List, search and statistics query types shared by every repository.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{
  dashboard::{DashboardScope, DashboardVersion},
  data_table::DataType,
};

// ─── Generic list query ──────────────────────────────────────────────────────

/// Field filters plus keyword search and paging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery<F> {
  pub filter:  F,
  /// Substring match over the entity's id and name columns.
  pub keyword: Option<String>,
  pub limit:   Option<usize>,
  pub offset:  Option<usize>,
}

impl<F> ListQuery<F> {
  pub fn new(filter: F) -> Self {
    Self { filter, keyword: None, limit: None, offset: None }
  }
}

/// A page of results and the number of matches before paging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResult<T> {
  pub results:     Vec<T>,
  pub total_count: u64,
}

// ─── Filters ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardFilter {
  pub dashboard_id: Option<String>,
  pub name:         Option<String>,
  pub scope:        Option<DashboardScope>,
  pub user_id:      Option<String>,
  pub project_id:   Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionFilter {
  pub dashboard_id: String,
  pub version:      Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetFilter {
  pub dashboard_id: Option<String>,
  pub widget_id:    Option<String>,
  pub name:         Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTableFilter {
  pub widget_id:     Option<String>,
  pub data_table_id: Option<String>,
  pub name:          Option<String>,
  pub data_type:     Option<DataType>,
  pub source_type:   Option<String>,
  pub operator:      Option<String>,
}

pub type DashboardQuery = ListQuery<DashboardFilter>;
pub type VersionQuery = ListQuery<VersionFilter>;
pub type WidgetQuery = ListQuery<WidgetFilter>;
pub type DataTableQuery = ListQuery<DataTableFilter>;

/// Result of listing a dashboard's versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionList {
  pub results:        Vec<DashboardVersion>,
  pub total_count:    u64,
  /// The dashboard's current version number.
  pub latest_version: u32,
}

// ─── Statistics ──────────────────────────────────────────────────────────────

/// Dashboard fields that [`StatQuery`] may group by.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatField {
  Scope,
  Viewers,
  Version,
  SchemaVersion,
  UserId,
  WorkspaceId,
  ProjectId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatQuery {
  pub group_by: StatField,
  #[serde(default)]
  pub filter:   DashboardFilter,
  pub keyword:  Option<String>,
}

/// One group of a statistics result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBucket {
  /// `None` groups records where the field is unset.
  pub key:   Option<String>,
  pub count: u64,
}
