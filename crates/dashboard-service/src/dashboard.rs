//! Dashboard operations and the version flow.

use std::sync::Arc;

use dashboard_core::{
  dashboard::{
    DEFAULT_SCHEMA_VERSION, Dashboard, DashboardPatch, DashboardScope,
    DashboardVersion, NewDashboard, NewVersion, Settings,
  },
  ownership::{Access, Caller, Ownership},
  query::{
    DashboardQuery, ListResult, StatBucket, StatQuery, VersionList,
    VersionQuery,
  },
  store::DashboardStore,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{Error, Result, validate::required_str};

const DASHBOARD: &str = "dashboard";
const DASHBOARD_VERSION: &str = "dashboard version";

/// Body of a dashboard create request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateDashboard {
  pub name:           Option<String>,
  pub layouts:        Option<Vec<Value>>,
  #[serde(alias = "dashboard_options", alias = "variables")]
  pub options:        Option<Map<String, Value>>,
  pub settings:       Option<Settings>,
  #[serde(alias = "dashboard_options_schema", alias = "variables_schema")]
  pub options_schema: Option<Map<String, Value>>,
  #[serde(default)]
  pub labels:         Vec<String>,
  #[serde(default)]
  pub tags:           Map<String, Value>,
  pub schema_version: Option<String>,
  /// Marks the dashboard as the caller's own. Must equal the caller's id.
  pub user_id:        Option<String>,
  pub workspace_id:   Option<String>,
  pub project_id:     Option<String>,
}

impl CreateDashboard {
  fn has_all_versioned_fields(&self) -> bool {
    self.layouts.is_some() && self.options.is_some() && self.options_schema.is_some()
  }
}

pub struct DashboardService<S> {
  store: Arc<S>,
}

impl<S: DashboardStore> DashboardService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub async fn create(&self, caller: &Caller, req: CreateDashboard) -> Result<Dashboard> {
    let snapshot_initial = req.has_all_versioned_fields();
    let name = required_str("name", req.name)?;
    let domain_id = required_str("domain_id", Some(caller.domain_id.clone()))?;

    let scope = match req.user_id {
      Some(user_id) if user_id != caller.user_id => {
        tracing::warn!(%user_id, caller = %caller.user_id, "rejected dashboard create for another user");
        return Err(Error::InvalidUserId { user_id, caller_id: caller.user_id.clone() });
      }
      Some(_) => DashboardScope::User,
      None => DashboardScope::Domain,
    };

    if let (Some(projects), Some(project_id)) = (&caller.user_projects, &req.project_id)
      && !projects.contains(project_id)
    {
      return Err(Error::InvalidParameter {
        key:    "project_id",
        reason: format!("project {project_id} is not accessible"),
      });
    }

    let owner = Ownership {
      domain_id,
      workspace_id: caller.workspace_id.clone().or(req.workspace_id),
      project_id: req.project_id,
      user_id: (scope == DashboardScope::User).then(|| caller.user_id.clone()),
    };

    let input = NewDashboard {
      name,
      scope,
      schema_version: req
        .schema_version
        .unwrap_or_else(|| DEFAULT_SCHEMA_VERSION.to_owned()),
      layouts: req.layouts.unwrap_or_default(),
      options: req.options.unwrap_or_default(),
      settings: req.settings.unwrap_or_default(),
      options_schema: req.options_schema.unwrap_or_default(),
      labels: req.labels,
      tags: req.tags,
      owner,
    };

    let dashboard = self.store.create_dashboard(input).await.map_err(Error::store)?;
    tracing::info!(dashboard_id = %dashboard.dashboard_id, scope = %dashboard.scope, "created dashboard");

    if snapshot_initial {
      self
        .store
        .create_version(NewVersion::snapshot(&dashboard))
        .await
        .map_err(Error::store)?;
    }

    Ok(dashboard)
  }

  /// Apply `patch`. When a versioned field changes, the counter is bumped
  /// first and the pre-update values are stored under the new number.
  pub async fn update(
    &self,
    caller: &Caller,
    dashboard_id: &str,
    patch: DashboardPatch,
  ) -> Result<Dashboard> {
    let current = self.get(caller, dashboard_id).await?;

    if patch.changes_versioned_fields(&current) {
      let bumped = self
        .store
        .increment_version(dashboard_id)
        .await
        .map_err(Error::store)?
        .ok_or_else(|| Error::not_found(DASHBOARD, dashboard_id))?;

      let snapshot = NewVersion { version: bumped.version, ..NewVersion::snapshot(&current) };
      self.store.create_version(snapshot).await.map_err(Error::store)?;
      tracing::info!(dashboard_id, version = bumped.version, "bumped dashboard version");
    }

    self
      .store
      .update_dashboard(dashboard_id, patch)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(DASHBOARD, dashboard_id))
  }

  /// Remove a dashboard. Its versions, widgets and data tables are left in
  /// place.
  pub async fn delete(&self, caller: &Caller, dashboard_id: &str) -> Result<()> {
    self.get(caller, dashboard_id).await?;
    if !self.store.delete_dashboard(dashboard_id).await.map_err(Error::store)? {
      return Err(Error::not_found(DASHBOARD, dashboard_id));
    }
    tracing::info!(dashboard_id, "deleted dashboard");
    Ok(())
  }

  pub async fn get(&self, caller: &Caller, dashboard_id: &str) -> Result<Dashboard> {
    tracing::debug!(dashboard_id, "get dashboard");
    self
      .store
      .get_dashboard(dashboard_id, &Access::any(caller))
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(DASHBOARD, dashboard_id))
  }

  pub async fn list(
    &self,
    caller: &Caller,
    query: &DashboardQuery,
  ) -> Result<ListResult<Dashboard>> {
    self
      .store
      .list_dashboards(query, &Access::any(caller))
      .await
      .map_err(Error::store)
  }

  pub async fn stat(&self, caller: &Caller, query: &StatQuery) -> Result<Vec<StatBucket>> {
    self
      .store
      .stat_dashboards(query, &Access::any(caller))
      .await
      .map_err(Error::store)
  }

  // ── Versions ──────────────────────────────────────────────────────────────

  pub async fn get_version(
    &self,
    caller: &Caller,
    dashboard_id: &str,
    version: u32,
  ) -> Result<DashboardVersion> {
    self.get(caller, dashboard_id).await?;
    self
      .store
      .get_version(dashboard_id, version, &caller.domain_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::not_found(DASHBOARD_VERSION, format!("{dashboard_id}@{version}")))
  }

  /// List the snapshots of `query.filter.dashboard_id`, newest first.
  pub async fn list_versions(&self, caller: &Caller, query: &VersionQuery) -> Result<VersionList> {
    let dashboard = self.get(caller, &query.filter.dashboard_id).await?;
    let page = self
      .store
      .list_versions(query, &caller.domain_id)
      .await
      .map_err(Error::store)?;

    Ok(VersionList {
      results:        page.results,
      total_count:    page.total_count,
      latest_version: dashboard.version,
    })
  }

  pub async fn delete_version(
    &self,
    caller: &Caller,
    dashboard_id: &str,
    version: u32,
  ) -> Result<()> {
    let dashboard = self.get(caller, dashboard_id).await?;
    if version == dashboard.version {
      return Err(Error::LatestVersion(version));
    }

    let removed = self
      .store
      .delete_version(dashboard_id, version, &caller.domain_id)
      .await
      .map_err(Error::store)?;
    if !removed {
      return Err(Error::not_found(DASHBOARD_VERSION, format!("{dashboard_id}@{version}")));
    }
    tracing::info!(dashboard_id, version, "deleted dashboard version");
    Ok(())
  }

  /// Restore the versioned fields stored in snapshot `version`. Runs through
  /// [`Self::update`], so the counter moves when the values differ.
  pub async fn revert_version(
    &self,
    caller: &Caller,
    dashboard_id: &str,
    version: u32,
  ) -> Result<Dashboard> {
    let snapshot = self.get_version(caller, dashboard_id, version).await?;
    tracing::info!(dashboard_id, version, "reverting dashboard");

    let patch = DashboardPatch {
      layouts: Some(snapshot.layouts),
      options: Some(snapshot.options),
      options_schema: Some(snapshot.options_schema),
      ..Default::default()
    };
    self.update(caller, dashboard_id, patch).await
  }
}
