//! The data-loading collaborator behind widget `load`.
//!
//! Executing a data source query or a transformation pipeline is outside this
//! service. Implementations of [`DataLoader`] plug those engines in; the
//! bundled [`EmptyLoader`] answers every request with no rows.

use std::{convert::Infallible, future::Future};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ownership::Visibility;

/// Everything a loader needs to answer a widget's data request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadRequest {
  pub visibility: Visibility,
  pub widget_id:  String,
  pub domain_id:  String,
  /// For a source: the table's options. For a transformation: the
  /// `options[operator]` sub-mapping.
  pub options:    Map<String, Value>,
  /// Analyze query supplied by the widget.
  pub query:      Value,
  /// Dashboard variable values.
  pub vars:       Map<String, Value>,
}

/// Rows produced by a load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadResult {
  pub results:     Vec<Value>,
  pub total_count: u64,
}

impl LoadResult {
  pub fn empty() -> Self { Self::default() }
}

pub trait DataLoader: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Load rows for a table added directly from `source_type`.
  fn load_source<'a>(
    &'a self,
    source_type: Option<&'a str>,
    request: &'a LoadRequest,
  ) -> impl Future<Output = Result<LoadResult, Self::Error>> + Send + 'a;

  /// Load rows for a table derived by `operator`.
  fn load_transformation<'a>(
    &'a self,
    operator: Option<&'a str>,
    request: &'a LoadRequest,
  ) -> impl Future<Output = Result<LoadResult, Self::Error>> + Send + 'a;
}

/// A loader with no engine behind it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyLoader;

impl DataLoader for EmptyLoader {
  type Error = Infallible;

  async fn load_source(
    &self,
    _source_type: Option<&str>,
    _request: &LoadRequest,
  ) -> Result<LoadResult, Infallible> {
    Ok(LoadResult::empty())
  }

  async fn load_transformation(
    &self,
    _operator: Option<&str>,
    _request: &LoadRequest,
  ) -> Result<LoadResult, Infallible> {
    Ok(LoadResult::empty())
  }
}
