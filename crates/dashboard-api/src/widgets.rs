//! Handlers for `/{private,public}/widgets` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/widgets` | `dashboard_id`, `widget_id`, `name`, `keyword`, paging |
//! | `POST` | `/widgets` | Body: [`CreateWidget`] |
//! | `GET`/`PATCH`/`DELETE` | `/widgets/{id}` | |
//! | `POST` | `/widgets/{id}/load` | Body: [`LoadWidget`] |

use axum::{
  Extension, Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use dashboard_core::{
  load::{DataLoader, LoadResult},
  ownership::Caller,
  query::{ListQuery, ListResult, WidgetFilter},
  store::DashboardStore,
  widget::{Widget, WidgetPatch},
};
use dashboard_service::widget::{CreateWidget, LoadWidget};
use serde::Deserialize;

use crate::{TierState, error::ApiError};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub dashboard_id: Option<String>,
  pub widget_id:    Option<String>,
  pub name:         Option<String>,
  pub keyword:      Option<String>,
  pub limit:        Option<usize>,
  pub offset:       Option<usize>,
}

/// `GET /widgets`
pub async fn list<S, L>(
  State(tier): State<TierState<S, L>>,
  Extension(caller): Extension<Caller>,
  Query(params): Query<ListParams>,
) -> Result<Json<ListResult<Widget>>, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  let query = ListQuery {
    filter:  WidgetFilter {
      dashboard_id: params.dashboard_id,
      widget_id:    params.widget_id,
      name:         params.name,
    },
    keyword: params.keyword,
    limit:   params.limit,
    offset:  params.offset,
  };
  Ok(Json(tier.widgets().list(&caller, &query).await?))
}

/// `POST /widgets`
pub async fn create<S, L>(
  State(tier): State<TierState<S, L>>,
  Extension(caller): Extension<Caller>,
  Json(body): Json<CreateWidget>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  let widget = tier.widgets().create(&caller, body).await?;
  Ok((StatusCode::CREATED, Json(widget)))
}

/// `GET /widgets/{id}`
pub async fn get_one<S, L>(
  State(tier): State<TierState<S, L>>,
  Extension(caller): Extension<Caller>,
  Path(id): Path<String>,
) -> Result<Json<Widget>, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  Ok(Json(tier.widgets().get(&caller, &id).await?))
}

/// `PATCH /widgets/{id}`
pub async fn update<S, L>(
  State(tier): State<TierState<S, L>>,
  Extension(caller): Extension<Caller>,
  Path(id): Path<String>,
  Json(patch): Json<WidgetPatch>,
) -> Result<Json<Widget>, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  Ok(Json(tier.widgets().update(&caller, &id, patch).await?))
}

/// `DELETE /widgets/{id}`
pub async fn delete<S, L>(
  State(tier): State<TierState<S, L>>,
  Extension(caller): Extension<Caller>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  tier.widgets().delete(&caller, &id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /widgets/{id}/load`
pub async fn load<S, L>(
  State(tier): State<TierState<S, L>>,
  Extension(caller): Extension<Caller>,
  Path(id): Path<String>,
  Json(body): Json<LoadWidget>,
) -> Result<Json<LoadResult>, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  Ok(Json(tier.widgets().load(&caller, &id, body).await?))
}
