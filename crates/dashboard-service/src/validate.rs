//! Required-parameter checks run before any store access.

use crate::{Error, Result};

/// A required string: present and not blank.
pub fn required_str(key: &'static str, value: Option<String>) -> Result<String> {
  value
    .filter(|v| !v.trim().is_empty())
    .ok_or(Error::RequiredParameter(key))
}

/// A required value of any other type.
pub fn required<T>(key: &'static str, value: Option<T>) -> Result<T> {
  value.ok_or(Error::RequiredParameter(key))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_strings_are_missing() {
    assert!(matches!(
      required_str("name", Some("  ".into())),
      Err(Error::RequiredParameter("name"))
    ));
    assert!(matches!(
      required_str("name", None),
      Err(Error::RequiredParameter("name"))
    ));
    assert_eq!(required_str("name", Some("costs".into())).unwrap(), "costs");
  }

  #[test]
  fn required_passes_values_through() {
    assert_eq!(required("version", Some(3)).unwrap(), 3);
    assert!(required::<u32>("version", None).is_err());
  }
}
