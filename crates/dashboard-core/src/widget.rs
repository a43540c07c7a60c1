//! Widgets: single visual elements placed on a dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ownership::{Ownership, Visibility};

/// Widget type assigned when the caller leaves it unset.
pub const DEFAULT_WIDGET_TYPE: &str = "NONE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
  pub widget_id:     String,
  pub name:          String,
  pub description:   Option<String>,
  pub widget_type:   String,
  pub options:       Option<Map<String, Value>>,
  pub tags:          Map<String, Value>,
  pub dashboard_id:  String,
  /// The data table feeding this widget, if one has been bound.
  pub data_table_id: Option<String>,
  pub visibility:    Visibility,
  #[serde(flatten)]
  pub owner:         Ownership,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

/// Input to [`crate::store::WidgetRepository::create_widget`].
#[derive(Debug, Clone)]
pub struct NewWidget {
  pub name:         String,
  pub description:  Option<String>,
  pub widget_type:  String,
  pub options:      Option<Map<String, Value>>,
  pub tags:         Map<String, Value>,
  pub dashboard_id: String,
  pub visibility:   Visibility,
  pub owner:        Ownership,
}

/// Field update for a widget. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetPatch {
  pub name:          Option<String>,
  pub description:   Option<String>,
  pub widget_type:   Option<String>,
  pub options:       Option<Map<String, Value>>,
  pub data_table_id: Option<String>,
  pub tags:          Option<Map<String, Value>>,
}

impl WidgetPatch {
  pub fn apply(self, widget: &mut Widget) {
    if let Some(name) = self.name {
      widget.name = name;
    }
    if let Some(description) = self.description {
      widget.description = Some(description);
    }
    if let Some(widget_type) = self.widget_type {
      widget.widget_type = widget_type;
    }
    if let Some(options) = self.options {
      widget.options = Some(options);
    }
    if let Some(data_table_id) = self.data_table_id {
      widget.data_table_id = Some(data_table_id);
    }
    if let Some(tags) = self.tags {
      widget.tags = tags;
    }
  }
}
