//! Service layer for the dashboard system.
//!
//! Sits between the transport and the repositories: validates requests,
//! checks parent existence and ownership, runs the dashboard version flow and
//! shapes results. Every operation takes the authenticated [`Caller`] and
//! builds its access filter from it.
//!
//! [`Caller`]: dashboard_core::ownership::Caller

pub mod dashboard;
pub mod data_table;
pub mod error;
pub mod validate;
pub mod widget;

use std::sync::Arc;

use dashboard_core::{load::DataLoader, ownership::Visibility, store::DashboardStore};

pub use dashboard::DashboardService;
pub use data_table::DataTableService;
pub use error::{Error, Result};
pub use widget::WidgetService;

/// Every service, sharing one store and one loader.
pub struct Services<S, L> {
  pub dashboards:          DashboardService<S>,
  pub private_widgets:     WidgetService<S, L>,
  pub public_widgets:      WidgetService<S, L>,
  pub private_data_tables: DataTableService<S>,
  pub public_data_tables:  DataTableService<S>,
}

impl<S: DashboardStore, L: DataLoader> Services<S, L> {
  pub fn new(store: Arc<S>, loader: Arc<L>) -> Self {
    Self {
      dashboards:          DashboardService::new(store.clone()),
      private_widgets:     WidgetService::private(store.clone(), loader.clone()),
      public_widgets:      WidgetService::public(store.clone(), loader),
      private_data_tables: DataTableService::private(store.clone()),
      public_data_tables:  DataTableService::public(store),
    }
  }

  pub fn widgets(&self, visibility: Visibility) -> &WidgetService<S, L> {
    match visibility {
      Visibility::Private => &self.private_widgets,
      Visibility::Public => &self.public_widgets,
    }
  }

  pub fn data_tables(&self, visibility: Visibility) -> &DataTableService<S> {
    match visibility {
      Visibility::Private => &self.private_data_tables,
      Visibility::Public => &self.public_data_tables,
    }
  }
}

#[cfg(test)]
mod tests;
