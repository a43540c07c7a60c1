//! Resource identifier generation.

use uuid::Uuid;

pub const DASHBOARD_PREFIX: &str = "dash";
pub const PRIVATE_WIDGET_PREFIX: &str = "private-widget";
pub const PUBLIC_WIDGET_PREFIX: &str = "public-widget";
pub const PRIVATE_DATA_TABLE_PREFIX: &str = "private-dt";
pub const PUBLIC_DATA_TABLE_PREFIX: &str = "public-dt";

/// Generate an identifier of the form `<prefix>-<12 hex chars>`.
pub fn generate_id(prefix: &str) -> String {
  let hex = Uuid::new_v4().simple().to_string();
  format!("{prefix}-{}", &hex[..12])
}
