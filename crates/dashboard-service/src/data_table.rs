//! Data table operations, shared by the private and public variants.

use std::sync::Arc;

use dashboard_core::{
  data_table::{DataTable, DataTablePatch, DataType, NewDataTable},
  load::LoadResult,
  ownership::{Access, Caller, Visibility},
  query::{DataTableQuery, ListResult},
  store::DashboardStore,
  widget::Widget,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
  Error, Result,
  validate::{required, required_str},
};

const WIDGET: &str = "widget";
const DATA_TABLE: &str = "data table";

/// Body of a data table add request: a table sourced directly from
/// `source_type`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddDataTable {
  pub widget_id:   Option<String>,
  pub name:        Option<String>,
  pub source_type: Option<String>,
  #[serde(default)]
  pub options:     Map<String, Value>,
  #[serde(default)]
  pub tags:        Map<String, Value>,
}

/// Body of a data table transform request: a table derived by `operator`,
/// configured under `options[operator]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransformDataTable {
  pub widget_id: Option<String>,
  pub name:      Option<String>,
  pub operator:  Option<String>,
  #[serde(default)]
  pub options:   Map<String, Value>,
  #[serde(default)]
  pub tags:      Map<String, Value>,
}

/// Fields a caller may change. State and error message are owned by the
/// process that evaluates the table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDataTable {
  pub name:        Option<String>,
  pub options:     Option<Map<String, Value>>,
  pub tags:        Option<Map<String, Value>>,
  pub labels_info: Option<Map<String, Value>>,
  pub data_info:   Option<Map<String, Value>>,
}

impl From<UpdateDataTable> for DataTablePatch {
  fn from(req: UpdateDataTable) -> Self {
    Self {
      name: req.name,
      options: req.options,
      tags: req.tags,
      labels_info: req.labels_info,
      data_info: req.data_info,
      ..Default::default()
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Granularity {
  Daily,
  Monthly,
  Yearly,
}

/// Body of a data table load request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoadDataTable {
  pub granularity: Option<Granularity>,
  pub start:       Option<String>,
  pub end:         Option<String>,
}

pub struct DataTableService<S> {
  store:      Arc<S>,
  visibility: Visibility,
}

impl<S: DashboardStore> DataTableService<S> {
  pub fn private(store: Arc<S>) -> Self {
    Self { store, visibility: Visibility::Private }
  }

  pub fn public(store: Arc<S>) -> Self {
    Self { store, visibility: Visibility::Public }
  }

  pub fn visibility(&self) -> Visibility { self.visibility }

  fn access(&self, caller: &Caller) -> Access {
    Access::with_visibility(caller, self.visibility)
  }

  async fn parent_widget(&self, caller: &Caller, widget_id: &str) -> Result<Widget> {
    self
      .store
      .get_widget(widget_id, &self.access(caller))
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(WIDGET, widget_id))
  }

  async fn insert(&self, input: NewDataTable) -> Result<DataTable> {
    let table = self
      .store
      .create_data_table(input)
      .await
      .map_err(Error::store)?;

    tracing::info!(
      data_table_id = %table.data_table_id,
      widget_id = %table.widget_id,
      data_type = %table.data_type,
      "created data table"
    );
    Ok(table)
  }

  /// Create a table sourced from `source_type`, owned like its widget.
  pub async fn add(&self, caller: &Caller, req: AddDataTable) -> Result<DataTable> {
    let widget_id = required_str("widget_id", req.widget_id)?;
    let source_type = required_str("source_type", req.source_type)?;
    let widget = self.parent_widget(caller, &widget_id).await?;

    let input = NewDataTable {
      name: req.name,
      data_type: DataType::Added,
      source_type: Some(source_type),
      operator: None,
      options: req.options,
      tags: req.tags,
      dashboard_id: widget.dashboard_id,
      widget_id: widget.widget_id,
      visibility: self.visibility,
      owner: widget.owner,
    };
    self.insert(input).await
  }

  /// Create a table derived by `operator`, owned like its widget.
  pub async fn transform(&self, caller: &Caller, req: TransformDataTable) -> Result<DataTable> {
    let widget_id = required_str("widget_id", req.widget_id)?;
    let operator = required_str("operator", req.operator)?;
    let widget = self.parent_widget(caller, &widget_id).await?;

    let input = NewDataTable {
      name: req.name,
      data_type: DataType::Transformed,
      source_type: None,
      operator: Some(operator),
      options: req.options,
      tags: req.tags,
      dashboard_id: widget.dashboard_id,
      widget_id: widget.widget_id,
      visibility: self.visibility,
      owner: widget.owner,
    };
    self.insert(input).await
  }

  pub async fn update(
    &self,
    caller: &Caller,
    data_table_id: &str,
    req: UpdateDataTable,
  ) -> Result<DataTable> {
    self.get(caller, data_table_id).await?;
    self
      .store
      .update_data_table(data_table_id, req.into())
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(DATA_TABLE, data_table_id))
  }

  pub async fn delete(&self, caller: &Caller, data_table_id: &str) -> Result<()> {
    self.get(caller, data_table_id).await?;
    if !self.store.delete_data_table(data_table_id).await.map_err(Error::store)? {
      return Err(Error::not_found(DATA_TABLE, data_table_id));
    }
    tracing::info!(data_table_id, "deleted data table");
    Ok(())
  }

  pub async fn get(&self, caller: &Caller, data_table_id: &str) -> Result<DataTable> {
    tracing::debug!(data_table_id, "get data table");
    self
      .store
      .get_data_table(data_table_id, &self.access(caller))
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(DATA_TABLE, data_table_id))
  }

  pub async fn list(
    &self,
    caller: &Caller,
    query: &DataTableQuery,
  ) -> Result<ListResult<DataTable>> {
    self
      .store
      .list_data_tables(query, &self.access(caller))
      .await
      .map_err(Error::store)
  }

  /// Evaluate a table over a time range. No evaluation engine is wired in,
  /// so an accessible table always yields an empty result.
  pub async fn load(
    &self,
    caller: &Caller,
    data_table_id: &str,
    req: LoadDataTable,
  ) -> Result<LoadResult> {
    let granularity = required("granularity", req.granularity)?;
    self.get(caller, data_table_id).await?;
    tracing::debug!(data_table_id, ?granularity, start = ?req.start, end = ?req.end, "load data table");
    Ok(LoadResult::empty())
  }
}
