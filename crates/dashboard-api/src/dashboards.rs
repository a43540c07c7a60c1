//! Handlers for `/dashboards` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/dashboards` | Filters, `keyword`, `limit`, `offset` |
//! | `POST` | `/dashboards` | Body: [`CreateDashboard`] |
//! | `GET`  | `/dashboards/stat` | `?group_by=<field>` plus list filters |
//! | `GET`/`PATCH`/`DELETE` | `/dashboards/{id}` | 404 if not visible |
//! | `GET`  | `/dashboards/{id}/versions` | Newest first, with `latest_version` |
//! | `GET`/`DELETE` | `/dashboards/{id}/versions/{version}` | Latest cannot be deleted |
//! | `POST` | `/dashboards/{id}/versions/{version}/revert` | |

use std::sync::Arc;

use axum::{
  Extension, Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use dashboard_core::{
  dashboard::{Dashboard, DashboardPatch, DashboardScope, DashboardVersion},
  load::DataLoader,
  ownership::Caller,
  query::{
    DashboardFilter, DashboardQuery, ListQuery, ListResult, StatBucket,
    StatField, StatQuery, VersionFilter, VersionList,
  },
  store::DashboardStore,
};
use dashboard_service::{Services, dashboard::CreateDashboard};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

type AppState<S, L> = State<Arc<Services<S, L>>>;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub dashboard_id: Option<String>,
  pub name:         Option<String>,
  pub scope:        Option<DashboardScope>,
  pub user_id:      Option<String>,
  pub project_id:   Option<String>,
  pub keyword:      Option<String>,
  pub limit:        Option<usize>,
  pub offset:       Option<usize>,
}

impl ListParams {
  fn filter(&self) -> DashboardFilter {
    DashboardFilter {
      dashboard_id: self.dashboard_id.clone(),
      name:         self.name.clone(),
      scope:        self.scope,
      user_id:      self.user_id.clone(),
      project_id:   self.project_id.clone(),
    }
  }

  fn into_query(self) -> DashboardQuery {
    ListQuery {
      filter:  self.filter(),
      keyword: self.keyword,
      limit:   self.limit,
      offset:  self.offset,
    }
  }
}

/// `GET /dashboards`
pub async fn list<S, L>(
  State(services): AppState<S, L>,
  Extension(caller): Extension<Caller>,
  Query(params): Query<ListParams>,
) -> Result<Json<ListResult<Dashboard>>, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  let page = services.dashboards.list(&caller, &params.into_query()).await?;
  Ok(Json(page))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /dashboards`
pub async fn create<S, L>(
  State(services): AppState<S, L>,
  Extension(caller): Extension<Caller>,
  Json(body): Json<CreateDashboard>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  let dashboard = services.dashboards.create(&caller, body).await?;
  Ok((StatusCode::CREATED, Json(dashboard)))
}

// ─── Stat ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatParams {
  pub group_by:     StatField,
  pub dashboard_id: Option<String>,
  pub name:         Option<String>,
  pub scope:        Option<DashboardScope>,
  pub user_id:      Option<String>,
  pub project_id:   Option<String>,
  pub keyword:      Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatResponse {
  pub results: Vec<StatBucket>,
}

/// `GET /dashboards/stat?group_by=<field>`
pub async fn stat<S, L>(
  State(services): AppState<S, L>,
  Extension(caller): Extension<Caller>,
  Query(params): Query<StatParams>,
) -> Result<Json<StatResponse>, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  let query = StatQuery {
    group_by: params.group_by,
    filter:   DashboardFilter {
      dashboard_id: params.dashboard_id,
      name:         params.name,
      scope:        params.scope,
      user_id:      params.user_id,
      project_id:   params.project_id,
    },
    keyword:  params.keyword,
  };
  let results = services.dashboards.stat(&caller, &query).await?;
  Ok(Json(StatResponse { results }))
}

// ─── Single dashboard ─────────────────────────────────────────────────────────

/// `GET /dashboards/{id}`
pub async fn get_one<S, L>(
  State(services): AppState<S, L>,
  Extension(caller): Extension<Caller>,
  Path(id): Path<String>,
) -> Result<Json<Dashboard>, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  Ok(Json(services.dashboards.get(&caller, &id).await?))
}

/// `PATCH /dashboards/{id}`
pub async fn update<S, L>(
  State(services): AppState<S, L>,
  Extension(caller): Extension<Caller>,
  Path(id): Path<String>,
  Json(patch): Json<DashboardPatch>,
) -> Result<Json<Dashboard>, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  Ok(Json(services.dashboards.update(&caller, &id, patch).await?))
}

/// `DELETE /dashboards/{id}`
pub async fn delete<S, L>(
  State(services): AppState<S, L>,
  Extension(caller): Extension<Caller>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  services.dashboards.delete(&caller, &id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Versions ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct VersionParams {
  pub version: Option<u32>,
  pub keyword: Option<String>,
  pub limit:   Option<usize>,
  pub offset:  Option<usize>,
}

/// `GET /dashboards/{id}/versions`
pub async fn list_versions<S, L>(
  State(services): AppState<S, L>,
  Extension(caller): Extension<Caller>,
  Path(id): Path<String>,
  Query(params): Query<VersionParams>,
) -> Result<Json<VersionList>, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  let query = ListQuery {
    filter:  VersionFilter { dashboard_id: id, version: params.version },
    keyword: params.keyword,
    limit:   params.limit,
    offset:  params.offset,
  };
  Ok(Json(services.dashboards.list_versions(&caller, &query).await?))
}

/// `GET /dashboards/{id}/versions/{version}`
pub async fn get_version<S, L>(
  State(services): AppState<S, L>,
  Extension(caller): Extension<Caller>,
  Path((id, version)): Path<(String, u32)>,
) -> Result<Json<DashboardVersion>, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  Ok(Json(services.dashboards.get_version(&caller, &id, version).await?))
}

/// `DELETE /dashboards/{id}/versions/{version}`
pub async fn delete_version<S, L>(
  State(services): AppState<S, L>,
  Extension(caller): Extension<Caller>,
  Path((id, version)): Path<(String, u32)>,
) -> Result<StatusCode, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  services.dashboards.delete_version(&caller, &id, version).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /dashboards/{id}/versions/{version}/revert`
pub async fn revert_version<S, L>(
  State(services): AppState<S, L>,
  Extension(caller): Extension<Caller>,
  Path((id, version)): Path<(String, u32)>,
) -> Result<Json<Dashboard>, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  Ok(Json(services.dashboards.revert_version(&caller, &id, version).await?))
}
