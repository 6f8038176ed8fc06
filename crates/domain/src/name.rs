//! Datasource names: the key into configuration and into the registry.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InvalidArgumentError;

/// A non-blank datasource identifier.
///
/// Construction always goes through [`DatasourceName::new`], so a value of
/// this type is never empty or whitespace-only.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DatasourceName(String);

impl DatasourceName {
    /// Name used when no datasource is given explicitly.
    pub const DEFAULT: &'static str = "default";

    /// Validate and wrap a datasource name.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgumentError::Blank`] when `name` is empty or only
    /// whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidArgumentError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(InvalidArgumentError::Blank {
                argument: "datasource_name",
            });
        }
        Ok(Self(name))
    }

    /// Whether this is the well-known default datasource.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DatasourceName {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for DatasourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DatasourceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for DatasourceName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DatasourceName {
    type Error = InvalidArgumentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for DatasourceName {
    type Error = InvalidArgumentError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DatasourceName> for String {
    fn from(value: DatasourceName) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_regular_name() {
        let name = DatasourceName::new("alt").unwrap();
        assert_eq!(name.as_str(), "alt");
        assert!(!name.is_default());
    }

    #[test]
    fn should_reject_empty_name() {
        let result = DatasourceName::new("");
        assert!(matches!(result, Err(InvalidArgumentError::Blank { .. })));
    }

    #[test]
    fn should_reject_whitespace_only_name() {
        assert!(DatasourceName::new(" \t\n").is_err());
    }

    #[test]
    fn should_default_to_well_known_name() {
        let name = DatasourceName::default();
        assert_eq!(name.as_str(), "default");
        assert!(name.is_default());
    }

    #[test]
    fn should_reject_blank_name_when_deserializing() {
        let result: Result<DatasourceName, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());
    }

    #[test]
    fn should_serialize_as_plain_string() {
        let name = DatasourceName::new("alt").unwrap();
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"alt\"");
    }
}
