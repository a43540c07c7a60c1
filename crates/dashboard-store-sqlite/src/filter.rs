//! Dynamic `WHERE` clause construction.
//!
//! Every clause uses anonymous `?` placeholders, so parameters are bound in
//! the order the clauses were pushed.

use dashboard_core::ownership::Access;
use rusqlite::types::Value;

#[derive(Debug, Default)]
pub struct Conditions {
  clauses: Vec<String>,
  params:  Vec<Value>,
}

impl Conditions {
  pub fn new() -> Self { Self::default() }

  /// Add a raw clause and the parameters its placeholders bind.
  pub fn push(
    &mut self,
    clause: impl Into<String>,
    params: impl IntoIterator<Item = Value>,
  ) -> &mut Self {
    self.clauses.push(clause.into());
    self.params.extend(params);
    self
  }

  /// `column = ?`, skipped when `value` is `None`.
  pub fn eq(
    &mut self,
    column: &str,
    value: Option<impl Into<Value>>,
  ) -> &mut Self {
    if let Some(value) = value {
      self.push(format!("{column} = ?"), [value.into()]);
    }
    self
  }

  /// Literal substring match over any of `columns`, skipped when `keyword`
  /// is unset or blank.
  pub fn keyword(&mut self, columns: &[&str], keyword: Option<&str>) -> &mut Self {
    let Some(keyword) = keyword.map(str::trim).filter(|k| !k.is_empty()) else {
      return self;
    };
    let pattern = format!("%{}%", escape_like(keyword));
    let clause = columns
      .iter()
      .map(|c| format!("{c} LIKE ? ESCAPE '\\'"))
      .collect::<Vec<_>>()
      .join(" OR ");
    self.push(
      format!("({clause})"),
      columns.iter().map(|_| Value::Text(pattern.clone())),
    )
  }

  /// The row-level access predicate. `visibility_column` names the column
  /// holding `PUBLIC`/`PRIVATE`.
  pub fn access(&mut self, visibility_column: &str, access: &Access) -> &mut Self {
    self.push("domain_id = ?", [Value::Text(access.domain_id.clone())]);
    self.push(
      format!("({visibility_column} = 'PUBLIC' OR user_id = ?)"),
      [Value::Text(access.user_id.clone())],
    );
    if let Some(visibility) = access.visibility {
      self.push(
        format!("{visibility_column} = ?"),
        [Value::Text(visibility.as_ref().to_owned())],
      );
    }
    if let Some(workspace_id) = &access.workspace_id {
      self.push(
        "(workspace_id IS NULL OR workspace_id = ?)",
        [Value::Text(workspace_id.clone())],
      );
    }
    match access.user_projects.as_deref() {
      None => {}
      Some([]) => {
        self.push("project_id IS NULL", []);
      }
      Some(projects) => {
        let marks = vec!["?"; projects.len()].join(", ");
        self.push(
          format!("(project_id IS NULL OR project_id IN ({marks}))"),
          projects.iter().cloned().map(Value::Text),
        );
      }
    }
    self
  }

  /// `WHERE …`, or an empty string when there are no clauses.
  pub fn where_clause(&self) -> String {
    if self.clauses.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", self.clauses.join(" AND "))
    }
  }

  pub fn into_params(self) -> Vec<Value> { self.params }
}

/// Escape `LIKE` wildcards so they match themselves under `ESCAPE '\'`.
fn escape_like(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    if matches!(c, '\\' | '%' | '_') {
      out.push('\\');
    }
    out.push(c);
  }
  out
}

/// `LIMIT ? OFFSET ?` parameters. SQLite requires a limit whenever an offset
/// is given, so an absent limit becomes `-1` (unbounded).
pub fn page_params(limit: Option<usize>, offset: Option<usize>) -> [Value; 2] {
  let limit = limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
  let offset = offset.map_or(0, |o| i64::try_from(o).unwrap_or(i64::MAX));
  [Value::Integer(limit), Value::Integer(offset)]
}

#[cfg(test)]
mod tests {
  use dashboard_core::ownership::{Caller, Visibility};

  use super::*;

  #[test]
  fn empty_conditions_render_nothing() {
    assert_eq!(Conditions::new().where_clause(), "");
  }

  #[test]
  fn params_follow_clause_order() {
    let mut conds = Conditions::new();
    conds
      .eq("name", Some("costs".to_owned()))
      .eq("scope", None::<String>)
      .keyword(&["dashboard_id", "name"], Some("co"));

    assert_eq!(
      conds.where_clause(),
      "WHERE name = ? AND (dashboard_id LIKE ? ESCAPE '\\' OR name LIKE ? ESCAPE '\\')"
    );
    assert_eq!(conds.into_params(), vec![
      Value::Text("costs".into()),
      Value::Text("%co%".into()),
      Value::Text("%co%".into()),
    ]);
  }

  #[test]
  fn keyword_wildcards_are_escaped() {
    let mut conds = Conditions::new();
    conds.keyword(&["name"], Some("50%_off\\"));
    assert_eq!(conds.into_params(), vec![Value::Text("%50\\%\\_off\\\\%".into())]);
  }

  #[test]
  fn access_with_empty_project_list_hides_project_records() {
    let caller = Caller {
      user_projects: Some(Vec::new()),
      ..Caller::new("alice", "domain-1")
    };
    let mut conds = Conditions::new();
    conds.access("viewers", &Access::with_visibility(&caller, Visibility::Public));

    let sql = conds.where_clause();
    assert!(sql.contains("viewers = ?"));
    assert!(sql.contains("project_id IS NULL"));
    assert!(!sql.contains("IN ("));
  }
}
