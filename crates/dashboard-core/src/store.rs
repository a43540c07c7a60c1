//! Repository traits, one per entity.
//!
//! The traits are implemented by storage backends (e.g.
//! `dashboard-store-sqlite`). The service layer depends on this abstraction,
//! not on any concrete backend. Each repository offers the same narrow
//! surface: create, get-by-id, filtered list, field update and delete. No
//! method cascades to other entities.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use crate::{
  dashboard::{Dashboard, DashboardPatch, DashboardVersion, NewDashboard, NewVersion},
  data_table::{DataTable, DataTablePatch, NewDataTable},
  ownership::Access,
  query::{
    DashboardQuery, DataTableQuery, ListResult, StatBucket, StatQuery,
    VersionQuery, WidgetQuery,
  },
  widget::{NewWidget, Widget, WidgetPatch},
};

/// Shared base of every repository: the backend's error type.
pub trait Store: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;
}

// ─── Dashboards ──────────────────────────────────────────────────────────────

pub trait DashboardRepository: Store {
  /// Persist a new dashboard at version 1.
  fn create_dashboard(
    &self,
    input: NewDashboard,
  ) -> impl Future<Output = Result<Dashboard, Self::Error>> + Send + '_;

  /// Retrieve a dashboard visible under `access`. Returns `None` if absent or
  /// hidden.
  fn get_dashboard<'a>(
    &'a self,
    dashboard_id: &'a str,
    access: &'a Access,
  ) -> impl Future<Output = Result<Option<Dashboard>, Self::Error>> + Send + 'a;

  /// List dashboards visible under `access`, ordered by name.
  fn list_dashboards<'a>(
    &'a self,
    query: &'a DashboardQuery,
    access: &'a Access,
  ) -> impl Future<Output = Result<ListResult<Dashboard>, Self::Error>> + Send + 'a;

  /// Count visible dashboards grouped by one field.
  fn stat_dashboards<'a>(
    &'a self,
    query: &'a StatQuery,
    access: &'a Access,
  ) -> impl Future<Output = Result<Vec<StatBucket>, Self::Error>> + Send + 'a;

  /// Apply `patch` and refresh `updated_at`. Returns `None` if absent.
  fn update_dashboard<'a>(
    &'a self,
    dashboard_id: &'a str,
    patch: DashboardPatch,
  ) -> impl Future<Output = Result<Option<Dashboard>, Self::Error>> + Send + 'a;

  /// Add one to the stored version counter and return the dashboard as it now
  /// stands. Returns `None` if absent.
  fn increment_version<'a>(
    &'a self,
    dashboard_id: &'a str,
  ) -> impl Future<Output = Result<Option<Dashboard>, Self::Error>> + Send + 'a;

  /// Remove a dashboard. Returns `false` if it did not exist.
  fn delete_dashboard<'a>(
    &'a self,
    dashboard_id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}

// ─── Versions ────────────────────────────────────────────────────────────────

pub trait VersionRepository: Store {
  /// Store an immutable snapshot. Fails if the `(dashboard_id, version)` pair
  /// is already taken.
  fn create_version(
    &self,
    input: NewVersion,
  ) -> impl Future<Output = Result<DashboardVersion, Self::Error>> + Send + '_;

  fn get_version<'a>(
    &'a self,
    dashboard_id: &'a str,
    version: u32,
    domain_id: &'a str,
  ) -> impl Future<Output = Result<Option<DashboardVersion>, Self::Error>> + Send + 'a;

  /// List one dashboard's snapshots, newest first.
  fn list_versions<'a>(
    &'a self,
    query: &'a VersionQuery,
    domain_id: &'a str,
  ) -> impl Future<Output = Result<ListResult<DashboardVersion>, Self::Error>> + Send + 'a;

  /// Remove one snapshot. Returns `false` if it did not exist.
  fn delete_version<'a>(
    &'a self,
    dashboard_id: &'a str,
    version: u32,
    domain_id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}

// ─── Widgets ─────────────────────────────────────────────────────────────────

pub trait WidgetRepository: Store {
  fn create_widget(
    &self,
    input: NewWidget,
  ) -> impl Future<Output = Result<Widget, Self::Error>> + Send + '_;

  fn get_widget<'a>(
    &'a self,
    widget_id: &'a str,
    access: &'a Access,
  ) -> impl Future<Output = Result<Option<Widget>, Self::Error>> + Send + 'a;

  fn list_widgets<'a>(
    &'a self,
    query: &'a WidgetQuery,
    access: &'a Access,
  ) -> impl Future<Output = Result<ListResult<Widget>, Self::Error>> + Send + 'a;

  fn update_widget<'a>(
    &'a self,
    widget_id: &'a str,
    patch: WidgetPatch,
  ) -> impl Future<Output = Result<Option<Widget>, Self::Error>> + Send + 'a;

  fn delete_widget<'a>(
    &'a self,
    widget_id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}

// ─── Data tables ─────────────────────────────────────────────────────────────

pub trait DataTableRepository: Store {
  fn create_data_table(
    &self,
    input: NewDataTable,
  ) -> impl Future<Output = Result<DataTable, Self::Error>> + Send + '_;

  fn get_data_table<'a>(
    &'a self,
    data_table_id: &'a str,
    access: &'a Access,
  ) -> impl Future<Output = Result<Option<DataTable>, Self::Error>> + Send + 'a;

  fn list_data_tables<'a>(
    &'a self,
    query: &'a DataTableQuery,
    access: &'a Access,
  ) -> impl Future<Output = Result<ListResult<DataTable>, Self::Error>> + Send + 'a;

  fn update_data_table<'a>(
    &'a self,
    data_table_id: &'a str,
    patch: DataTablePatch,
  ) -> impl Future<Output = Result<Option<DataTable>, Self::Error>> + Send + 'a;

  fn delete_data_table<'a>(
    &'a self,
    data_table_id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}

// ─── Combined ────────────────────────────────────────────────────────────────

/// A backend implementing every repository.
pub trait DashboardStore:
  DashboardRepository + VersionRepository + WidgetRepository + DataTableRepository
{
}

impl<T> DashboardStore for T where
  T: DashboardRepository
    + VersionRepository
    + WidgetRepository
    + DataTableRepository
{
}
