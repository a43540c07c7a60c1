//! Widget operations, shared by the private and public variants.

use std::sync::Arc;

use dashboard_core::{
  data_table::DataType,
  load::{DataLoader, LoadRequest, LoadResult},
  ownership::{Access, Caller, Visibility},
  query::{ListResult, WidgetQuery},
  store::DashboardStore,
  widget::{DEFAULT_WIDGET_TYPE, NewWidget, Widget, WidgetPatch},
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{Error, Result, validate::required_str};

const DASHBOARD: &str = "dashboard";
const WIDGET: &str = "widget";
const DATA_TABLE: &str = "data table";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateWidget {
  pub dashboard_id: Option<String>,
  pub name:         Option<String>,
  pub description:  Option<String>,
  pub widget_type:  Option<String>,
  pub options:      Option<Map<String, Value>>,
  #[serde(default)]
  pub tags:         Map<String, Value>,
}

/// Body of a widget load request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoadWidget {
  /// Analyze query forwarded to the loader.
  #[serde(default)]
  pub query: Value,
  /// Dashboard variable values.
  #[serde(default)]
  pub vars:  Map<String, Value>,
}

pub struct WidgetService<S, L> {
  store:      Arc<S>,
  loader:     Arc<L>,
  visibility: Visibility,
}

impl<S: DashboardStore, L: DataLoader> WidgetService<S, L> {
  pub fn private(store: Arc<S>, loader: Arc<L>) -> Self {
    Self { store, loader, visibility: Visibility::Private }
  }

  pub fn public(store: Arc<S>, loader: Arc<L>) -> Self {
    Self { store, loader, visibility: Visibility::Public }
  }

  pub fn visibility(&self) -> Visibility { self.visibility }

  fn access(&self, caller: &Caller) -> Access {
    Access::with_visibility(caller, self.visibility)
  }

  /// Create a widget on a dashboard of the same visibility. The widget takes
  /// the dashboard's ownership.
  pub async fn create(&self, caller: &Caller, req: CreateWidget) -> Result<Widget> {
    let dashboard_id = required_str("dashboard_id", req.dashboard_id)?;
    let name = required_str("name", req.name)?;

    let dashboard = self
      .store
      .get_dashboard(&dashboard_id, &self.access(caller))
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(DASHBOARD, dashboard_id.as_str()))?;

    if !dashboard.supports_widgets() {
      return Err(Error::NotSupportedVersion(dashboard.schema_version));
    }

    let widget = self
      .store
      .create_widget(NewWidget {
        name,
        description: req.description,
        widget_type: req.widget_type.unwrap_or_else(|| DEFAULT_WIDGET_TYPE.to_owned()),
        options: req.options,
        tags: req.tags,
        dashboard_id,
        visibility: self.visibility,
        owner: dashboard.owner,
      })
      .await
      .map_err(Error::store)?;

    tracing::info!(
      widget_id = %widget.widget_id,
      dashboard_id = %widget.dashboard_id,
      visibility = %self.visibility,
      "created widget"
    );
    Ok(widget)
  }

  /// Apply `patch`. A `data_table_id` must name a visible data table
  /// belonging to this widget.
  pub async fn update(
    &self,
    caller: &Caller,
    widget_id: &str,
    patch: WidgetPatch,
  ) -> Result<Widget> {
    self.get(caller, widget_id).await?;

    if let Some(data_table_id) = &patch.data_table_id {
      let table = self
        .store
        .get_data_table(data_table_id, &self.access(caller))
        .await
        .map_err(Error::store)?
        .ok_or_else(|| Error::not_found(DATA_TABLE, data_table_id.as_str()))?;
      if table.widget_id != widget_id {
        return Err(Error::InvalidParameter {
          key:    "data_table_id",
          reason: format!("data table {data_table_id} belongs to another widget"),
        });
      }
    }

    self
      .store
      .update_widget(widget_id, patch)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(WIDGET, widget_id))
  }

  /// Remove a widget. Its data tables are left in place.
  pub async fn delete(&self, caller: &Caller, widget_id: &str) -> Result<()> {
    self.get(caller, widget_id).await?;
    if !self.store.delete_widget(widget_id).await.map_err(Error::store)? {
      return Err(Error::not_found(WIDGET, widget_id));
    }
    tracing::info!(widget_id, "deleted widget");
    Ok(())
  }

  pub async fn get(&self, caller: &Caller, widget_id: &str) -> Result<Widget> {
    tracing::debug!(widget_id, "get widget");
    self
      .store
      .get_widget(widget_id, &self.access(caller))
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(WIDGET, widget_id))
  }

  pub async fn list(&self, caller: &Caller, query: &WidgetQuery) -> Result<ListResult<Widget>> {
    self
      .store
      .list_widgets(query, &self.access(caller))
      .await
      .map_err(Error::store)
  }

  /// Load the rows of the widget's bound data table through the loader.
  pub async fn load(
    &self,
    caller: &Caller,
    widget_id: &str,
    req: LoadWidget,
  ) -> Result<LoadResult> {
    let widget = self.get(caller, widget_id).await?;
    let Some(data_table_id) = widget.data_table_id else {
      return Err(Error::InvalidParameter {
        key:    "widget_id",
        reason: format!("widget {widget_id} has no data table"),
      });
    };

    let table = self
      .store
      .get_data_table(&data_table_id, &self.access(caller))
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(DATA_TABLE, data_table_id.as_str()))?;

    let options = match table.data_type {
      DataType::Added => table.options.clone(),
      DataType::Transformed => table.operator_options(),
    };
    let request = LoadRequest {
      visibility: self.visibility,
      widget_id: widget.widget_id,
      domain_id: caller.domain_id.clone(),
      options,
      query: req.query,
      vars: req.vars,
    };

    tracing::debug!(widget_id, %data_table_id, data_type = %table.data_type, "loading widget data");
    match table.data_type {
      DataType::Added => self
        .loader
        .load_source(table.source_type.as_deref(), &request)
        .await
        .map_err(Error::loader),
      DataType::Transformed => self
        .loader
        .load_transformation(table.operator.as_deref(), &request)
        .await
        .map_err(Error::loader),
    }
  }
}
