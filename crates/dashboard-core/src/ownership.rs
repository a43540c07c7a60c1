//! Ownership tiers and the access filter derived from an authenticated caller.
//!
//! Every stored record carries an [`Ownership`] that never changes after
//! creation. Reads and writes are gated by an [`Access`] built from the
//! [`Caller`] that the authentication layer injects into each request.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

// ─── Visibility ──────────────────────────────────────────────────────────────

/// Whether a record is shared across its scope or owned by a single user.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
  Public,
  Private,
}

// ─── Ownership ───────────────────────────────────────────────────────────────

/// The owning tiers of a record. Immutable once the record is created.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ownership {
  pub domain_id:    String,
  pub workspace_id: Option<String>,
  pub project_id:   Option<String>,
  /// Set for private records; public records may leave it empty.
  pub user_id:      Option<String>,
}

// ─── Caller ──────────────────────────────────────────────────────────────────

/// The authenticated identity behind a request. Never accepted from the
/// request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
  pub user_id:       String,
  pub domain_id:     String,
  /// Set when the caller is bound to a single workspace.
  pub workspace_id:  Option<String>,
  /// Set when the caller may only see a subset of projects.
  pub user_projects: Option<Vec<String>>,
}

impl Caller {
  /// A domain-wide caller with no workspace or project restriction.
  pub fn new(user_id: impl Into<String>, domain_id: impl Into<String>) -> Self {
    Self {
      user_id:       user_id.into(),
      domain_id:     domain_id.into(),
      workspace_id:  None,
      user_projects: None,
    }
  }
}

// ─── Access ──────────────────────────────────────────────────────────────────

/// Query filter applied to every repository read.
///
/// A record is visible when
/// - its domain matches,
/// - it is public, or private and owned by `user_id`,
/// - it has the required visibility (if one is set),
/// - it is bound to no workspace or to the caller's workspace (if the caller
///   has one),
/// - it is bound to no project or to one of the caller's projects (if the
///   caller has a project list).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Access {
  pub domain_id:     String,
  pub user_id:       String,
  pub visibility:    Option<Visibility>,
  pub workspace_id:  Option<String>,
  pub user_projects: Option<Vec<String>>,
}

impl Access {
  /// Access to both public and the caller's own private records.
  pub fn any(caller: &Caller) -> Self {
    Self {
      domain_id:     caller.domain_id.clone(),
      user_id:       caller.user_id.clone(),
      visibility:    None,
      workspace_id:  caller.workspace_id.clone(),
      user_projects: caller.user_projects.clone(),
    }
  }

  /// Access restricted to records of one visibility.
  pub fn with_visibility(caller: &Caller, visibility: Visibility) -> Self {
    Self { visibility: Some(visibility), ..Self::any(caller) }
  }

  pub fn permits(&self, visibility: Visibility, owner: &Ownership) -> bool {
    if owner.domain_id != self.domain_id {
      return false;
    }
    if self.visibility.is_some_and(|v| v != visibility) {
      return false;
    }
    if visibility == Visibility::Private
      && owner.user_id.as_deref() != Some(self.user_id.as_str())
    {
      return false;
    }
    if let (Some(required), Some(actual)) =
      (&self.workspace_id, &owner.workspace_id)
      && required != actual
    {
      return false;
    }
    if let (Some(projects), Some(project)) =
      (&self.user_projects, &owner.project_id)
      && !projects.contains(project)
    {
      return false;
    }
    true
  }
}
