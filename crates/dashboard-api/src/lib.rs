//! JSON REST API for the dashboard service.
//!
//! Exposes an axum [`Router`] backed by [`dashboard_service::Services`].
//! Handlers read the authenticated [`Caller`] from a request extension;
//! authentication itself is the embedding server's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = dashboard_api::api_router(services.clone())
//!   .layer(axum::Extension(caller));
//! ```
//!
//! [`Caller`]: dashboard_core::ownership::Caller

pub mod dashboards;
pub mod data_tables;
pub mod error;
pub mod widgets;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use dashboard_core::{load::DataLoader, ownership::Visibility, store::DashboardStore};
use dashboard_service::{DataTableService, Services, WidgetService};

pub use error::ApiError;

/// State of the `/private` and `/public` sub-routers: the shared services
/// plus the visibility the prefix selects.
pub struct TierState<S, L> {
  services:   Arc<Services<S, L>>,
  visibility: Visibility,
}

impl<S, L> Clone for TierState<S, L> {
  fn clone(&self) -> Self {
    Self { services: self.services.clone(), visibility: self.visibility }
  }
}

impl<S: DashboardStore, L: DataLoader> TierState<S, L> {
  fn widgets(&self) -> &WidgetService<S, L> { self.services.widgets(self.visibility) }

  fn data_tables(&self) -> &DataTableService<S> {
    self.services.data_tables(self.visibility)
  }
}

/// Build a fully-materialised API router for `services`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, L>(services: Arc<Services<S, L>>) -> Router<()>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  let private = tier_router(TierState {
    services:   services.clone(),
    visibility: Visibility::Private,
  });
  let public = tier_router(TierState {
    services:   services.clone(),
    visibility: Visibility::Public,
  });

  Router::new()
    .route("/dashboards", get(dashboards::list::<S, L>).post(dashboards::create::<S, L>))
    .route("/dashboards/stat", get(dashboards::stat::<S, L>))
    .route(
      "/dashboards/{id}",
      get(dashboards::get_one::<S, L>)
        .patch(dashboards::update::<S, L>)
        .delete(dashboards::delete::<S, L>),
    )
    .route("/dashboards/{id}/versions", get(dashboards::list_versions::<S, L>))
    .route(
      "/dashboards/{id}/versions/{version}",
      get(dashboards::get_version::<S, L>).delete(dashboards::delete_version::<S, L>),
    )
    .route(
      "/dashboards/{id}/versions/{version}/revert",
      post(dashboards::revert_version::<S, L>),
    )
    .with_state(services)
    .nest("/private", private)
    .nest("/public", public)
}

fn tier_router<S, L>(state: TierState<S, L>) -> Router<()>
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  Router::new()
    // Widgets
    .route("/widgets", get(widgets::list::<S, L>).post(widgets::create::<S, L>))
    .route(
      "/widgets/{id}",
      get(widgets::get_one::<S, L>)
        .patch(widgets::update::<S, L>)
        .delete(widgets::delete::<S, L>),
    )
    .route("/widgets/{id}/load", post(widgets::load::<S, L>))
    // Data tables
    .route("/data-tables", get(data_tables::list::<S, L>))
    .route("/data-tables/add", post(data_tables::add::<S, L>))
    .route("/data-tables/transform", post(data_tables::transform::<S, L>))
    .route(
      "/data-tables/{id}",
      get(data_tables::get_one::<S, L>)
        .patch(data_tables::update::<S, L>)
        .delete(data_tables::delete::<S, L>),
    )
    .route("/data-tables/{id}/load", post(data_tables::load::<S, L>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
