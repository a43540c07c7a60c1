//! Handlers for `/{private,public}/data-tables` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/data-tables` | Field filters, `keyword`, paging |
//! | `POST` | `/data-tables/add` | Body: [`AddDataTable`] |
//! | `POST` | `/data-tables/transform` | Body: [`TransformDataTable`] |
//! | `GET`/`PATCH`/`DELETE` | `/data-tables/{id}` | |
//! | `POST` | `/data-tables/{id}/load` | Body: [`LoadDataTable`] |

use axum::{
  Extension, Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use dashboard_core::{
  data_table::{DataTable, DataType},
  load::{DataLoader, LoadResult},
  ownership::Caller,
  query::{DataTableFilter, ListQuery, ListResult},
  store::DashboardStore,
};
use dashboard_service::data_table::{
  AddDataTable, LoadDataTable, TransformDataTable, UpdateDataTable,
};
use serde::Deserialize;

use crate::{TierState, error::ApiError};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub widget_id:     Option<String>,
  pub data_table_id: Option<String>,
  pub name:          Option<String>,
  pub data_type:     Option<DataType>,
  pub source_type:   Option<String>,
  pub operator:      Option<String>,
  pub keyword:       Option<String>,
  pub limit:         Option<usize>,
  pub offset:        Option<usize>,
}

/// `GET /data-tables`
pub async fn list<S, L>(
  State(tier): State<TierState<S, L>>,
  Extension(caller): Extension<Caller>,
  Query(params): Query<ListParams>,
) -> Result<Json<ListResult<DataTable>>, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  let query = ListQuery {
    filter:  DataTableFilter {
      widget_id:     params.widget_id,
      data_table_id: params.data_table_id,
      name:          params.name,
      data_type:     params.data_type,
      source_type:   params.source_type,
      operator:      params.operator,
    },
    keyword: params.keyword,
    limit:   params.limit,
    offset:  params.offset,
  };
  Ok(Json(tier.data_tables().list(&caller, &query).await?))
}

/// `POST /data-tables/add`
pub async fn add<S, L>(
  State(tier): State<TierState<S, L>>,
  Extension(caller): Extension<Caller>,
  Json(body): Json<AddDataTable>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  let table = tier.data_tables().add(&caller, body).await?;
  Ok((StatusCode::CREATED, Json(table)))
}

/// `POST /data-tables/transform`
pub async fn transform<S, L>(
  State(tier): State<TierState<S, L>>,
  Extension(caller): Extension<Caller>,
  Json(body): Json<TransformDataTable>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  let table = tier.data_tables().transform(&caller, body).await?;
  Ok((StatusCode::CREATED, Json(table)))
}

/// `GET /data-tables/{id}`
pub async fn get_one<S, L>(
  State(tier): State<TierState<S, L>>,
  Extension(caller): Extension<Caller>,
  Path(id): Path<String>,
) -> Result<Json<DataTable>, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  Ok(Json(tier.data_tables().get(&caller, &id).await?))
}

/// `PATCH /data-tables/{id}`
pub async fn update<S, L>(
  State(tier): State<TierState<S, L>>,
  Extension(caller): Extension<Caller>,
  Path(id): Path<String>,
  Json(body): Json<UpdateDataTable>,
) -> Result<Json<DataTable>, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  Ok(Json(tier.data_tables().update(&caller, &id, body).await?))
}

/// `DELETE /data-tables/{id}`
pub async fn delete<S, L>(
  State(tier): State<TierState<S, L>>,
  Extension(caller): Extension<Caller>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  tier.data_tables().delete(&caller, &id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /data-tables/{id}/load`
pub async fn load<S, L>(
  State(tier): State<TierState<S, L>>,
  Extension(caller): Extension<Caller>,
  Path(id): Path<String>,
  Json(body): Json<LoadDataTable>,
) -> Result<Json<LoadResult>, ApiError>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  Ok(Json(tier.data_tables().load(&caller, &id, body).await?))
}
