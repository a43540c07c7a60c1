//! Service tests against an in-memory SQLite store.

use std::{
  convert::Infallible,
  sync::{Arc, Mutex},
};

use dashboard_core::{
  dashboard::{DashboardPatch, DashboardScope, LEGACY_SCHEMA_VERSION},
  data_table::DataType,
  load::{DataLoader, LoadRequest, LoadResult},
  ownership::{Caller, Visibility},
  query::{DashboardQuery, ListQuery, VersionFilter, VersionQuery, WidgetQuery},
  widget::WidgetPatch,
};
use dashboard_store_sqlite::SqliteStore;
use serde_json::{Map, Value, json};

use crate::{
  Error, Services,
  dashboard::CreateDashboard,
  data_table::{AddDataTable, Granularity, LoadDataTable, TransformDataTable},
  widget::{CreateWidget, LoadWidget},
};

// ─── Fixtures ────────────────────────────────────────────────────────────────

/// Remembers every load call and answers with one row naming the path taken.
#[derive(Default)]
struct RecordingLoader {
  calls: Mutex<Vec<(&'static str, Option<String>, LoadRequest)>>,
}

impl RecordingLoader {
  fn record(&self, path: &'static str, name: Option<&str>, request: &LoadRequest) -> LoadResult {
    self
      .calls
      .lock()
      .unwrap()
      .push((path, name.map(str::to_owned), request.clone()));
    LoadResult { results: vec![json!({ "path": path })], total_count: 1 }
  }
}

impl DataLoader for RecordingLoader {
  type Error = Infallible;

  async fn load_source(
    &self,
    source_type: Option<&str>,
    request: &LoadRequest,
  ) -> Result<LoadResult, Infallible> {
    Ok(self.record("source", source_type, request))
  }

  async fn load_transformation(
    &self,
    operator: Option<&str>,
    request: &LoadRequest,
  ) -> Result<LoadResult, Infallible> {
    Ok(self.record("transformation", operator, request))
  }
}

struct Fixture {
  services: Services<SqliteStore, RecordingLoader>,
  loader:   Arc<RecordingLoader>,
}

async fn fixture() -> Fixture {
  let store = Arc::new(SqliteStore::open_in_memory().await.expect("in-memory store"));
  let loader = Arc::new(RecordingLoader::default());
  Fixture { services: Services::new(store, loader.clone()), loader }
}

fn alice() -> Caller { Caller::new("alice", "domain-1") }

fn bob() -> Caller { Caller::new("bob", "domain-1") }

fn map(value: Value) -> Map<String, Value> {
  value.as_object().cloned().unwrap_or_default()
}

fn named(name: &str) -> CreateDashboard {
  CreateDashboard { name: Some(name.into()), ..Default::default() }
}

/// A dashboard carrying all three versioned fields.
fn versioned(name: &str, layout: &str) -> CreateDashboard {
  CreateDashboard {
    layouts: Some(vec![json!({ "name": layout })]),
    options: Some(map(json!({ "currency": "USD" }))),
    options_schema: Some(map(json!({ "type": "object" }))),
    ..named(name)
  }
}

fn version_query(dashboard_id: &str) -> VersionQuery {
  ListQuery::new(VersionFilter { dashboard_id: dashboard_id.into(), version: None })
}

fn layouts_patch(layout: &str) -> DashboardPatch {
  DashboardPatch {
    layouts: Some(vec![json!({ "name": layout })]),
    ..Default::default()
  }
}

// ─── Dashboard create ────────────────────────────────────────────────────────

#[tokio::test]
async fn create_without_user_id_is_domain_scoped() {
  let f = fixture().await;
  let d = f.services.dashboards.create(&alice(), named("costs")).await.unwrap();
  assert_eq!(d.scope, DashboardScope::Domain);
  assert_eq!(d.viewers, Visibility::Public);
  assert_eq!(d.owner.domain_id, "domain-1");
  assert!(d.owner.user_id.is_none());
}

#[tokio::test]
async fn create_with_own_user_id_is_user_scoped() {
  let f = fixture().await;
  let req = CreateDashboard { user_id: Some("alice".into()), ..named("mine") };
  let d = f.services.dashboards.create(&alice(), req).await.unwrap();
  assert_eq!(d.scope, DashboardScope::User);
  assert_eq!(d.viewers, Visibility::Private);
  assert_eq!(d.owner.user_id.as_deref(), Some("alice"));

  let hidden = f.services.dashboards.get(&bob(), &d.dashboard_id).await;
  assert!(matches!(hidden, Err(Error::NotFound { .. })));
}

#[tokio::test]
async fn create_with_foreign_user_id_is_rejected() {
  let f = fixture().await;
  let req = CreateDashboard { user_id: Some("bob".into()), ..named("theirs") };
  let err = f.services.dashboards.create(&alice(), req).await.unwrap_err();
  assert!(matches!(err, Error::InvalidUserId { .. }));
  assert_eq!(err.code(), "ERROR_INVALID_USER_ID");
}

#[tokio::test]
async fn create_requires_a_name() {
  let f = fixture().await;
  let err = f
    .services
    .dashboards
    .create(&alice(), CreateDashboard::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::RequiredParameter("name")));
}

#[tokio::test]
async fn create_with_partial_versioned_fields_takes_no_snapshot() {
  let f = fixture().await;
  let req = CreateDashboard {
    options: Some(map(json!({ "project_id": "project-1" }))),
    ..named("costs")
  };
  let d = f.services.dashboards.create(&alice(), req).await.unwrap();
  assert_eq!(d.version, 1);

  let versions = f
    .services
    .dashboards
    .list_versions(&alice(), &version_query(&d.dashboard_id))
    .await
    .unwrap();
  assert_eq!(versions.total_count, 0);
  assert_eq!(versions.latest_version, 1);
}

#[tokio::test]
async fn create_with_all_versioned_fields_snapshots_version_one() {
  let f = fixture().await;
  let d = f.services.dashboards.create(&alice(), versioned("costs", "a")).await.unwrap();
  assert_eq!(d.version, 1);

  let versions = f
    .services
    .dashboards
    .list_versions(&alice(), &version_query(&d.dashboard_id))
    .await
    .unwrap();
  assert_eq!(versions.total_count, 1);
  assert_eq!(versions.results[0].version, 1);
  assert_eq!(versions.results[0].layouts, d.layouts);
}

#[tokio::test]
async fn create_rejects_projects_outside_the_caller_list() {
  let f = fixture().await;
  let caller = Caller {
    user_projects: Some(vec!["project-a".into()]),
    ..alice()
  };
  let req = CreateDashboard { project_id: Some("project-b".into()), ..named("p") };
  let err = f.services.dashboards.create(&caller, req).await.unwrap_err();
  assert!(matches!(err, Error::InvalidParameter { key: "project_id", .. }));
}

// ─── Dashboard update and versions ───────────────────────────────────────────

#[tokio::test]
async fn unchanged_versioned_fields_do_not_bump() {
  let f = fixture().await;
  let d = f.services.dashboards.create(&alice(), versioned("costs", "a")).await.unwrap();

  let patch = DashboardPatch {
    name: Some("renamed".into()),
    layouts: Some(d.layouts.clone()),
    options: Some(d.options.clone()),
    ..Default::default()
  };
  let updated = f
    .services
    .dashboards
    .update(&alice(), &d.dashboard_id, patch)
    .await
    .unwrap();
  assert_eq!(updated.name, "renamed");
  assert_eq!(updated.version, 1);

  let versions = f
    .services
    .dashboards
    .list_versions(&alice(), &version_query(&d.dashboard_id))
    .await
    .unwrap();
  assert_eq!(versions.total_count, 1);
}

#[tokio::test]
async fn changed_layouts_bump_and_snapshot_previous_values() {
  let f = fixture().await;
  let d = f.services.dashboards.create(&alice(), versioned("costs", "a")).await.unwrap();

  let updated = f
    .services
    .dashboards
    .update(&alice(), &d.dashboard_id, layouts_patch("b"))
    .await
    .unwrap();
  assert_eq!(updated.version, 2);
  assert_eq!(updated.layouts, vec![json!({ "name": "b" })]);

  let versions = f
    .services
    .dashboards
    .list_versions(&alice(), &version_query(&d.dashboard_id))
    .await
    .unwrap();
  assert_eq!(versions.total_count, 2);
  assert_eq!(versions.latest_version, 2);

  let v2 = f
    .services
    .dashboards
    .get_version(&alice(), &d.dashboard_id, 2)
    .await
    .unwrap();
  assert_eq!(v2.layouts, d.layouts);
}

#[tokio::test]
async fn changed_options_alone_bump_once() {
  let f = fixture().await;
  let d = f.services.dashboards.create(&alice(), versioned("costs", "a")).await.unwrap();

  let patch = DashboardPatch {
    options: Some(map(json!({ "currency": "KRW" }))),
    ..Default::default()
  };
  let updated = f
    .services
    .dashboards
    .update(&alice(), &d.dashboard_id, patch)
    .await
    .unwrap();
  assert_eq!(updated.version, 2);

  let versions = f
    .services
    .dashboards
    .list_versions(&alice(), &version_query(&d.dashboard_id))
    .await
    .unwrap();
  assert_eq!(versions.total_count, 2);
  let v2 = &versions.results[0];
  assert_eq!(v2.version, 2);
  assert_eq!(v2.options, d.options);
}

#[tokio::test]
async fn changed_schema_alone_bumps_once() {
  let f = fixture().await;
  let d = f.services.dashboards.create(&alice(), versioned("costs", "a")).await.unwrap();

  let patch = DashboardPatch {
    options_schema: Some(map(json!({ "type": "array" }))),
    ..Default::default()
  };
  let updated = f
    .services
    .dashboards
    .update(&alice(), &d.dashboard_id, patch)
    .await
    .unwrap();
  assert_eq!(updated.version, 2);

  let v2 = f
    .services
    .dashboards
    .get_version(&alice(), &d.dashboard_id, 2)
    .await
    .unwrap();
  assert_eq!(v2.options_schema, d.options_schema);
}

#[tokio::test]
async fn equal_layouts_mask_changed_options() {
  let f = fixture().await;
  let d = f.services.dashboards.create(&alice(), versioned("costs", "a")).await.unwrap();

  let patch = DashboardPatch {
    layouts: Some(d.layouts.clone()),
    options: Some(map(json!({ "currency": "KRW" }))),
    ..Default::default()
  };
  let updated = f
    .services
    .dashboards
    .update(&alice(), &d.dashboard_id, patch)
    .await
    .unwrap();
  assert_eq!(updated.version, 1);
  assert_eq!(updated.options, map(json!({ "currency": "KRW" })));

  let versions = f
    .services
    .dashboards
    .list_versions(&alice(), &version_query(&d.dashboard_id))
    .await
    .unwrap();
  assert_eq!(versions.total_count, 1);
}

#[tokio::test]
async fn empty_layouts_defer_to_changed_options() {
  let f = fixture().await;
  let d = f.services.dashboards.create(&alice(), versioned("costs", "a")).await.unwrap();

  let patch = DashboardPatch {
    layouts: Some(Vec::new()),
    options: Some(map(json!({ "currency": "KRW" }))),
    ..Default::default()
  };
  let updated = f
    .services
    .dashboards
    .update(&alice(), &d.dashboard_id, patch)
    .await
    .unwrap();
  assert_eq!(updated.version, 2);
  assert!(updated.layouts.is_empty());
}

#[tokio::test]
async fn deleting_the_latest_version_is_rejected() {
  let f = fixture().await;
  let d = f.services.dashboards.create(&alice(), versioned("costs", "a")).await.unwrap();

  let err = f
    .services
    .dashboards
    .delete_version(&alice(), &d.dashboard_id, 1)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::LatestVersion(1)));
  assert_eq!(err.code(), "ERROR_LATEST_VERSION");
}

#[tokio::test]
async fn deleting_an_older_version_removes_only_that_record() {
  let f = fixture().await;
  let d = f.services.dashboards.create(&alice(), versioned("costs", "a")).await.unwrap();
  f.services
    .dashboards
    .update(&alice(), &d.dashboard_id, layouts_patch("b"))
    .await
    .unwrap();

  f.services
    .dashboards
    .delete_version(&alice(), &d.dashboard_id, 1)
    .await
    .unwrap();

  let versions = f
    .services
    .dashboards
    .list_versions(&alice(), &version_query(&d.dashboard_id))
    .await
    .unwrap();
  let numbers: Vec<_> = versions.results.iter().map(|v| v.version).collect();
  assert_eq!(numbers, [2]);

  let again = f
    .services
    .dashboards
    .delete_version(&alice(), &d.dashboard_id, 1)
    .await;
  assert!(matches!(again, Err(Error::NotFound { .. })));
}

#[tokio::test]
async fn revert_restores_snapshot_and_bumps() {
  let f = fixture().await;
  let d = f.services.dashboards.create(&alice(), versioned("costs", "a")).await.unwrap();
  for layout in ["b", "c"] {
    f.services
      .dashboards
      .update(&alice(), &d.dashboard_id, layouts_patch(layout))
      .await
      .unwrap();
  }

  let v3 = f
    .services
    .dashboards
    .get_version(&alice(), &d.dashboard_id, 3)
    .await
    .unwrap();
  let reverted = f
    .services
    .dashboards
    .revert_version(&alice(), &d.dashboard_id, 3)
    .await
    .unwrap();

  assert_eq!(reverted.version, 4);
  assert_eq!(reverted.layouts, v3.layouts);
  assert_eq!(reverted.options, v3.options);
  assert_eq!(reverted.options_schema, v3.options_schema);
}

#[tokio::test]
async fn missing_version_is_not_found() {
  let f = fixture().await;
  let d = f.services.dashboards.create(&alice(), named("costs")).await.unwrap();
  let err = f
    .services
    .dashboards
    .get_version(&alice(), &d.dashboard_id, 7)
    .await
    .unwrap_err();
  assert_eq!(err.code(), "ERROR_NOT_FOUND");
}

// ─── Dashboard reads ─────────────────────────────────────────────────────────

#[tokio::test]
async fn list_returns_only_visible_dashboards() {
  let f = fixture().await;
  f.services.dashboards.create(&alice(), named("shared")).await.unwrap();
  f.services
    .dashboards
    .create(&alice(), CreateDashboard { user_id: Some("alice".into()), ..named("alice's") })
    .await
    .unwrap();
  f.services
    .dashboards
    .create(&bob(), CreateDashboard { user_id: Some("bob".into()), ..named("bob's") })
    .await
    .unwrap();
  f.services
    .dashboards
    .create(&Caller::new("carol", "domain-2"), named("elsewhere"))
    .await
    .unwrap();

  let listed = f
    .services
    .dashboards
    .list(&alice(), &DashboardQuery::default())
    .await
    .unwrap();
  let names: Vec<_> = listed.results.iter().map(|d| d.name.as_str()).collect();
  assert_eq!(names, ["alice's", "shared"]);
  assert_eq!(listed.total_count, listed.results.len() as u64);
}

#[tokio::test]
async fn delete_leaves_versions_in_place() {
  let f = fixture().await;
  let d = f.services.dashboards.create(&alice(), versioned("costs", "a")).await.unwrap();
  f.services.dashboards.delete(&alice(), &d.dashboard_id).await.unwrap();

  let gone = f.services.dashboards.get(&alice(), &d.dashboard_id).await;
  assert!(matches!(gone, Err(Error::NotFound { kind: "dashboard", .. })));
  let again = f.services.dashboards.delete(&alice(), &d.dashboard_id).await;
  assert!(matches!(again, Err(Error::NotFound { .. })));
}

// ─── Widgets ─────────────────────────────────────────────────────────────────

fn widget_on(dashboard_id: &str) -> CreateWidget {
  CreateWidget {
    dashboard_id: Some(dashboard_id.into()),
    name: Some("spend".into()),
    ..Default::default()
  }
}

#[tokio::test]
async fn widget_create_rejects_legacy_schema() {
  let f = fixture().await;
  let legacy = CreateDashboard {
    schema_version: Some(LEGACY_SCHEMA_VERSION.into()),
    ..named("old")
  };
  let d = f.services.dashboards.create(&alice(), legacy).await.unwrap();

  let err = f
    .services
    .public_widgets
    .create(&alice(), widget_on(&d.dashboard_id))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotSupportedVersion(ref v) if v == "1.0"));
}

#[tokio::test]
async fn widget_inherits_dashboard_ownership() {
  let f = fixture().await;
  let req = CreateDashboard {
    user_id: Some("alice".into()),
    project_id: Some("project-1".into()),
    ..named("mine")
  };
  let d = f.services.dashboards.create(&alice(), req).await.unwrap();

  let w = f
    .services
    .private_widgets
    .create(&alice(), widget_on(&d.dashboard_id))
    .await
    .unwrap();
  assert!(w.widget_id.starts_with("private-widget-"));
  assert_eq!(w.owner, d.owner);
  assert_eq!(w.widget_type, "NONE");
  assert_eq!(w.visibility, Visibility::Private);
}

#[tokio::test]
async fn widget_variant_must_match_dashboard_visibility() {
  let f = fixture().await;
  let d = f.services.dashboards.create(&alice(), named("shared")).await.unwrap();

  let err = f
    .services
    .private_widgets
    .create(&alice(), widget_on(&d.dashboard_id))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: "dashboard", .. }));
}

#[tokio::test]
async fn widget_list_filters_by_dashboard() {
  let f = fixture().await;
  let a = f.services.dashboards.create(&alice(), named("a")).await.unwrap();
  let b = f.services.dashboards.create(&alice(), named("b")).await.unwrap();
  let widgets = &f.services.public_widgets;
  widgets.create(&alice(), widget_on(&a.dashboard_id)).await.unwrap();
  widgets.create(&alice(), widget_on(&a.dashboard_id)).await.unwrap();
  widgets.create(&alice(), widget_on(&b.dashboard_id)).await.unwrap();

  let mut query = WidgetQuery::default();
  query.filter.dashboard_id = Some(a.dashboard_id.clone());
  let listed = widgets.list(&alice(), &query).await.unwrap();
  assert_eq!(listed.total_count, 2);
  assert!(listed.results.iter().all(|w| w.dashboard_id == a.dashboard_id));
}

#[tokio::test]
async fn widget_update_rejects_foreign_data_table() {
  let f = fixture().await;
  let d = f.services.dashboards.create(&alice(), named("shared")).await.unwrap();
  let widgets = &f.services.public_widgets;
  let first = widgets.create(&alice(), widget_on(&d.dashboard_id)).await.unwrap();
  let second = widgets.create(&alice(), widget_on(&d.dashboard_id)).await.unwrap();

  let table = f
    .services
    .public_data_tables
    .add(&alice(), AddDataTable {
      widget_id: Some(second.widget_id.clone()),
      source_type: Some("COST".into()),
      ..Default::default()
    })
    .await
    .unwrap();

  let patch = WidgetPatch {
    data_table_id: Some(table.data_table_id.clone()),
    ..Default::default()
  };
  let err = widgets
    .update(&alice(), &first.widget_id, patch.clone())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidParameter { key: "data_table_id", .. }));

  let bound = widgets.update(&alice(), &second.widget_id, patch).await.unwrap();
  assert_eq!(bound.data_table_id, Some(table.data_table_id));
}

#[tokio::test]
async fn widget_update_with_unknown_data_table_is_not_found() {
  let f = fixture().await;
  let d = f.services.dashboards.create(&alice(), named("shared")).await.unwrap();
  let widgets = &f.services.public_widgets;
  let widget = widgets.create(&alice(), widget_on(&d.dashboard_id)).await.unwrap();

  let patch = WidgetPatch {
    data_table_id: Some("public-dt-doesnotexist".into()),
    ..Default::default()
  };
  let err = widgets
    .update(&alice(), &widget.widget_id, patch)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: "data table", .. }));
  assert_eq!(err.code(), "ERROR_NOT_FOUND");

  let unchanged = widgets.get(&alice(), &widget.widget_id).await.unwrap();
  assert!(unchanged.data_table_id.is_none());
}

#[tokio::test]
async fn widget_load_requires_a_bound_table() {
  let f = fixture().await;
  let d = f.services.dashboards.create(&alice(), named("shared")).await.unwrap();
  let w = f
    .services
    .public_widgets
    .create(&alice(), widget_on(&d.dashboard_id))
    .await
    .unwrap();

  let err = f
    .services
    .public_widgets
    .load(&alice(), &w.widget_id, LoadWidget::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::InvalidParameter { key: "widget_id", .. }));
}

#[tokio::test]
async fn widget_load_dispatches_on_data_type() {
  let f = fixture().await;
  let d = f.services.dashboards.create(&alice(), named("shared")).await.unwrap();
  let widgets = &f.services.public_widgets;
  let tables = &f.services.public_data_tables;
  let w = widgets.create(&alice(), widget_on(&d.dashboard_id)).await.unwrap();

  let added = tables
    .add(&alice(), AddDataTable {
      widget_id: Some(w.widget_id.clone()),
      source_type: Some("COST".into()),
      options: map(json!({ "granularity": "MONTHLY" })),
      ..Default::default()
    })
    .await
    .unwrap();
  let transformed = tables
    .transform(&alice(), TransformDataTable {
      widget_id: Some(w.widget_id.clone()),
      operator: Some("JOIN".into()),
      options: map(json!({ "JOIN": { "how": "left" } })),
      ..Default::default()
    })
    .await
    .unwrap();

  let bind = |id: &str| WidgetPatch { data_table_id: Some(id.into()), ..Default::default() };

  widgets.update(&alice(), &w.widget_id, bind(&added.data_table_id)).await.unwrap();
  let req = LoadWidget { query: json!({ "group_by": ["provider"] }), vars: Map::new() };
  let result = widgets.load(&alice(), &w.widget_id, req).await.unwrap();
  assert_eq!(result.results, vec![json!({ "path": "source" })]);

  widgets
    .update(&alice(), &w.widget_id, bind(&transformed.data_table_id))
    .await
    .unwrap();
  widgets
    .load(&alice(), &w.widget_id, LoadWidget::default())
    .await
    .unwrap();

  let calls = f.loader.calls.lock().unwrap();
  assert_eq!(calls.len(), 2);

  let (path, name, request) = &calls[0];
  assert_eq!(*path, "source");
  assert_eq!(name.as_deref(), Some("COST"));
  assert_eq!(request.options, map(json!({ "granularity": "MONTHLY" })));
  assert_eq!(request.query, json!({ "group_by": ["provider"] }));
  assert_eq!(request.domain_id, "domain-1");

  let (path, name, request) = &calls[1];
  assert_eq!(*path, "transformation");
  assert_eq!(name.as_deref(), Some("JOIN"));
  assert_eq!(request.options, map(json!({ "how": "left" })));
}

// ─── Data tables ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn public_add_records_added_and_inherits_widget() {
  let f = fixture().await;
  let req = CreateDashboard { project_id: Some("project-1".into()), ..named("shared") };
  let d = f.services.dashboards.create(&alice(), req).await.unwrap();
  let w = f
    .services
    .public_widgets
    .create(&alice(), widget_on(&d.dashboard_id))
    .await
    .unwrap();

  let t = f
    .services
    .public_data_tables
    .add(&alice(), AddDataTable {
      widget_id: Some(w.widget_id.clone()),
      source_type: Some("COST".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(t.data_type, DataType::Added);
  assert!(t.data_table_id.starts_with("public-dt-"));
  assert_eq!(t.dashboard_id, d.dashboard_id);
  assert_eq!(t.owner, w.owner);
}

#[tokio::test]
async fn add_requires_source_type_and_visible_widget() {
  let f = fixture().await;
  let tables = &f.services.private_data_tables;

  let err = tables
    .add(&alice(), AddDataTable {
      widget_id: Some("private-widget-missing".into()),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::RequiredParameter("source_type")));

  let err = tables
    .add(&alice(), AddDataTable {
      widget_id: Some("private-widget-missing".into()),
      source_type: Some("COST".into()),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound { kind: "widget", .. }));
}

#[tokio::test]
async fn transform_requires_operator() {
  let f = fixture().await;
  let err = f
    .services
    .public_data_tables
    .transform(&alice(), TransformDataTable {
      widget_id: Some("public-widget-1".into()),
      ..Default::default()
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::RequiredParameter("operator")));
}

#[tokio::test]
async fn data_table_load_needs_granularity_and_returns_nothing() {
  let f = fixture().await;
  let d = f.services.dashboards.create(&alice(), named("shared")).await.unwrap();
  let w = f
    .services
    .public_widgets
    .create(&alice(), widget_on(&d.dashboard_id))
    .await
    .unwrap();
  let tables = &f.services.public_data_tables;
  let t = tables
    .add(&alice(), AddDataTable {
      widget_id: Some(w.widget_id),
      source_type: Some("COST".into()),
      ..Default::default()
    })
    .await
    .unwrap();

  let err = tables
    .load(&alice(), &t.data_table_id, LoadDataTable::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::RequiredParameter("granularity")));

  let req = LoadDataTable { granularity: Some(Granularity::Monthly), ..Default::default() };
  let result = tables.load(&alice(), &t.data_table_id, req).await.unwrap();
  assert!(result.results.is_empty());
  assert_eq!(result.total_count, 0);
}

#[tokio::test]
async fn private_tables_are_invisible_to_other_users() {
  let f = fixture().await;
  let req = CreateDashboard { user_id: Some("alice".into()), ..named("mine") };
  let d = f.services.dashboards.create(&alice(), req).await.unwrap();
  let w = f
    .services
    .private_widgets
    .create(&alice(), widget_on(&d.dashboard_id))
    .await
    .unwrap();
  let t = f
    .services
    .private_data_tables
    .add(&alice(), AddDataTable {
      widget_id: Some(w.widget_id),
      source_type: Some("COST".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(t.data_table_id.starts_with("private-dt-"));

  let err = f
    .services
    .private_data_tables
    .get(&bob(), &t.data_table_id)
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound { .. }));
  assert!(
    f.services
      .public_data_tables
      .get(&alice(), &t.data_table_id)
      .await
      .is_err()
  );
}
