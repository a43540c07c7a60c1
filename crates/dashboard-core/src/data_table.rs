//! Data tables: tabular datasets consumed by widgets.
//!
//! A data table is either *added* directly from an external source, or
//! *transformed* from other tables by a named operator whose settings live
//! under `options[operator]`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumString};

use crate::ownership::{Ownership, Visibility};

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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
  /// Sourced directly from an external source type.
  Added,
  /// Derived by an operator over other tables.
  Transformed,
}

/// Availability of a data table. Set by an external collaborator; no service
/// operation moves a table between states.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DataTableState {
  #[default]
  Available,
  Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
  pub data_table_id: String,
  pub name:          Option<String>,
  pub state:         DataTableState,
  pub error_message: Option<String>,
  pub data_type:     DataType,
  pub source_type:   Option<String>,
  pub operator:      Option<String>,
  pub options:       Map<String, Value>,
  pub tags:          Map<String, Value>,
  pub labels_info:   Option<Map<String, Value>>,
  pub data_info:     Option<Map<String, Value>>,
  pub dashboard_id:  String,
  pub widget_id:     String,
  pub visibility:    Visibility,
  #[serde(flatten)]
  pub owner:         Ownership,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

impl DataTable {
  /// Options for this table's operator: `options[operator]`, or an empty map
  /// when the operator is unset or has no object entry.
  pub fn operator_options(&self) -> Map<String, Value> {
    self
      .operator
      .as_deref()
      .and_then(|op| self.options.get(op))
      .and_then(Value::as_object)
      .cloned()
      .unwrap_or_default()
  }
}

/// Input to [`crate::store::DataTableRepository::create_data_table`].
/// The store assigns the id, timestamps and the initial `AVAILABLE` state.
#[derive(Debug, Clone)]
pub struct NewDataTable {
  pub name:         Option<String>,
  pub data_type:    DataType,
  pub source_type:  Option<String>,
  pub operator:     Option<String>,
  pub options:      Map<String, Value>,
  pub tags:         Map<String, Value>,
  pub dashboard_id: String,
  pub widget_id:    String,
  pub visibility:   Visibility,
  pub owner:        Ownership,
}

/// Field update for a data table. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataTablePatch {
  pub name:          Option<String>,
  pub state:         Option<DataTableState>,
  pub error_message: Option<String>,
  pub options:       Option<Map<String, Value>>,
  pub tags:          Option<Map<String, Value>>,
  pub labels_info:   Option<Map<String, Value>>,
  pub data_info:     Option<Map<String, Value>>,
}

impl DataTablePatch {
  pub fn apply(self, table: &mut DataTable) {
    if let Some(name) = self.name {
      table.name = Some(name);
    }
    if let Some(state) = self.state {
      table.state = state;
    }
    if let Some(error_message) = self.error_message {
      table.error_message = Some(error_message);
    }
    if let Some(options) = self.options {
      table.options = options;
    }
    if let Some(tags) = self.tags {
      table.tags = tags;
    }
    if let Some(labels_info) = self.labels_info {
      table.labels_info = Some(labels_info);
    }
    if let Some(data_info) = self.data_info {
      table.data_info = Some(data_info);
    }
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn table(operator: Option<&str>, options: Value) -> DataTable {
    let now = Utc::now();
    DataTable {
      data_table_id: "private-dt-000000000000".into(),
      name:          None,
      state:         DataTableState::default(),
      error_message: None,
      data_type:     DataType::Transformed,
      source_type:   None,
      operator:      operator.map(str::to_owned),
      options:       options.as_object().cloned().unwrap_or_default(),
      tags:          Map::new(),
      labels_info:   None,
      data_info:     None,
      dashboard_id:  "dash-1".into(),
      widget_id:     "private-widget-1".into(),
      visibility:    Visibility::Private,
      owner:         Ownership::default(),
      created_at:    now,
      updated_at:    now,
    }
  }

  #[test]
  fn operator_options_picks_sub_mapping() {
    let t = table(Some("JOIN"), json!({"JOIN": {"how": "left"}, "other": 1}));
    assert_eq!(t.operator_options().get("how"), Some(&json!("left")));
  }

  #[test]
  fn operator_options_empty_when_missing() {
    assert!(table(Some("JOIN"), json!({})).operator_options().is_empty());
    assert!(table(None, json!({"JOIN": {}})).operator_options().is_empty());
  }

  #[test]
  fn enum_names_round_trip_as_upper_case() {
    assert_eq!(DataType::Added.as_ref(), "ADDED");
    assert_eq!("TRANSFORMED".parse::<DataType>().unwrap(), DataType::Transformed);
    assert_eq!(DataTableState::Unavailable.to_string(), "UNAVAILABLE");
  }
}
