//! HTTP server wiring for the dashboard API.
//!
//! Holds the runtime configuration, authenticates each request against the
//! configured users and mounts [`dashboard_api::api_router`] behind it.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware};
use dashboard_core::{load::DataLoader, store::DashboardStore};
use dashboard_service::Services;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, UserConfig, authenticate};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  #[serde(default)]
  pub users:      Vec<UserConfig>,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("dashboard.sqlite3") }

// ─── Application state ────────────────────────────────────────────────────────

pub struct AppState<S, L> {
  pub services: Arc<Services<S, L>>,
  pub auth:     Arc<AuthConfig>,
}

impl<S, L> Clone for AppState<S, L> {
  fn clone(&self) -> Self {
    Self { services: self.services.clone(), auth: self.auth.clone() }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the server's [`Router`]: the API behind Basic authentication, with
/// request tracing.
pub fn router<S, L>(state: AppState<S, L>) -> Router
where
  S: DashboardStore + 'static,
  L: DataLoader + 'static,
{
  dashboard_api::api_router(state.services)
    .layer(middleware::from_fn_with_state(state.auth, authenticate))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
