//! Dashboards and their version snapshots.
//!
//! A dashboard carries three *versioned* fields: `layouts`, `options` and
//! `options_schema`. Changing any of them through an update bumps the
//! dashboard's `version` counter and stores a [`DashboardVersion`] snapshot.
//! Snapshots are immutable once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumString};

use crate::ownership::{Ownership, Visibility};

/// Layout schema format whose dashboards cannot hold widgets.
pub const LEGACY_SCHEMA_VERSION: &str = "1.0";

/// Layout schema format assigned to new dashboards.
pub const DEFAULT_SCHEMA_VERSION: &str = "2.0";

// ─── Scope ───────────────────────────────────────────────────────────────────

/// Who a dashboard belongs to.
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
pub enum DashboardScope {
  /// Shared by everyone in the domain (narrowed by workspace/project ids).
  Domain,
  /// Owned by a single user.
  User,
}

impl DashboardScope {
  /// The viewer visibility implied by the scope.
  pub fn visibility(self) -> Visibility {
    match self {
      Self::Domain => Visibility::Public,
      Self::User => Visibility::Private,
    }
  }
}

// ─── Settings ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateRange {
  pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Currency {
  pub enabled: bool,
  /// ISO 4217 code, empty when unset.
  pub value:   String,
}

/// Display toggles shared by every widget on a dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub date_range: DateRange,
  pub currency:   Currency,
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
  pub dashboard_id:   String,
  pub name:           String,
  pub scope:          DashboardScope,
  pub viewers:        Visibility,
  /// Revision counter; starts at 1 and only grows.
  pub version:        u32,
  /// Layout schema format, e.g. `"2.0"`.
  pub schema_version: String,
  pub layouts:        Vec<Value>,
  pub options:        Map<String, Value>,
  pub settings:       Settings,
  pub options_schema: Map<String, Value>,
  pub labels:         Vec<String>,
  pub tags:           Map<String, Value>,
  #[serde(flatten)]
  pub owner:          Ownership,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

impl Dashboard {
  pub fn supports_widgets(&self) -> bool {
    self.schema_version != LEGACY_SCHEMA_VERSION
  }
}

/// Input to [`crate::store::DashboardRepository::create_dashboard`].
/// Identifier, version and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewDashboard {
  pub name:           String,
  pub scope:          DashboardScope,
  pub schema_version: String,
  pub layouts:        Vec<Value>,
  pub options:        Map<String, Value>,
  pub settings:       Settings,
  pub options_schema: Map<String, Value>,
  pub labels:         Vec<String>,
  pub tags:           Map<String, Value>,
  pub owner:          Ownership,
}

impl NewDashboard {
  /// Convenience constructor with every optional field empty.
  pub fn new(
    name: impl Into<String>,
    scope: DashboardScope,
    owner: Ownership,
  ) -> Self {
    Self {
      name: name.into(),
      scope,
      schema_version: DEFAULT_SCHEMA_VERSION.to_owned(),
      layouts: Vec::new(),
      options: Map::new(),
      settings: Settings::default(),
      options_schema: Map::new(),
      labels: Vec::new(),
      tags: Map::new(),
      owner,
    }
  }
}

// ─── Patch ───────────────────────────────────────────────────────────────────

/// Field update for a dashboard. `None` leaves the stored value untouched.
/// Ownership, scope and version cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardPatch {
  pub name:           Option<String>,
  pub layouts:        Option<Vec<Value>>,
  #[serde(alias = "dashboard_options", alias = "variables")]
  pub options:        Option<Map<String, Value>>,
  pub settings:       Option<Settings>,
  #[serde(alias = "dashboard_options_schema", alias = "variables_schema")]
  pub options_schema: Option<Map<String, Value>>,
  pub labels:         Option<Vec<String>>,
  pub tags:           Option<Map<String, Value>>,
}

impl DashboardPatch {
  /// Whether applying this patch should bump the dashboard's version.
  ///
  /// Only the first present, non-empty versioned field in priority order
  /// (layouts, options, schema) is compared against `current`. Later fields
  /// are ignored even when they differ. Empty lists and maps never count.
  pub fn changes_versioned_fields(&self, current: &Dashboard) -> bool {
    if let Some(layouts) = self.layouts.as_ref().filter(|l| !l.is_empty()) {
      return *layouts != current.layouts;
    }
    if let Some(options) = self.options.as_ref().filter(|o| !o.is_empty()) {
      return *options != current.options;
    }
    if let Some(schema) = self.options_schema.as_ref().filter(|s| !s.is_empty()) {
      return *schema != current.options_schema;
    }
    false
  }

  /// Write every present field into `dashboard`.
  pub fn apply(self, dashboard: &mut Dashboard) {
    if let Some(name) = self.name {
      dashboard.name = name;
    }
    if let Some(layouts) = self.layouts {
      dashboard.layouts = layouts;
    }
    if let Some(options) = self.options {
      dashboard.options = options;
    }
    if let Some(settings) = self.settings {
      dashboard.settings = settings;
    }
    if let Some(schema) = self.options_schema {
      dashboard.options_schema = schema;
    }
    if let Some(labels) = self.labels {
      dashboard.labels = labels;
    }
    if let Some(tags) = self.tags {
      dashboard.tags = tags;
    }
  }
}

// ─── Versions ────────────────────────────────────────────────────────────────

/// An immutable snapshot of a dashboard's versioned fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardVersion {
  pub dashboard_id:   String,
  pub version:        u32,
  pub layouts:        Vec<Value>,
  pub options:        Map<String, Value>,
  pub settings:       Settings,
  pub options_schema: Map<String, Value>,
  pub domain_id:      String,
  pub created_at:     DateTime<Utc>,
}

/// Input to [`crate::store::VersionRepository::create_version`].
#[derive(Debug, Clone)]
pub struct NewVersion {
  pub dashboard_id:   String,
  pub version:        u32,
  pub layouts:        Vec<Value>,
  pub options:        Map<String, Value>,
  pub settings:       Settings,
  pub options_schema: Map<String, Value>,
  pub domain_id:      String,
}

impl NewVersion {
  /// Snapshot `dashboard` as it is now, numbered with its current version.
  pub fn snapshot(dashboard: &Dashboard) -> Self {
    Self {
      dashboard_id:   dashboard.dashboard_id.clone(),
      version:        dashboard.version,
      layouts:        dashboard.layouts.clone(),
      options:        dashboard.options.clone(),
      settings:       dashboard.settings.clone(),
      options_schema: dashboard.options_schema.clone(),
      domain_id:      dashboard.owner.domain_id.clone(),
    }
  }
}
