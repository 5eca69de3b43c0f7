//! Newtype IDs for type-safe identifiers.
//!
//! Item ids come from page markup and end up in URL paths, so they are only
//! constructed through validation. Control ids are opaque handles chosen by
//! the host layer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Macro to generate the shared surface of newtype ID structs.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub struct $name(String);

        impl $name {
            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identifier of a cart item, taken from a control's `data-plato-id`.
    ItemId
);

define_id!(
    /// Opaque handle of a DOM control (button or input).
    ControlId
);

impl ItemId {
    /// Parse and validate an item id.
    ///
    /// Surrounding whitespace is trimmed. The remainder must be non-empty and
    /// consist of ASCII alphanumerics, `-` or `_`.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        let valid = !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(CoreError::InvalidItemId(raw.to_string()))
        }
    }
}

impl std::str::FromStr for ItemId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

impl ControlId {
    /// Create a control id from a host-chosen key.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl From<&str> for ControlId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ControlId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_numeric() {
        let id = ItemId::parse("42").unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn test_item_id_trims_whitespace() {
        let id = ItemId::parse("  plato_7 ").unwrap();
        assert_eq!(id.as_str(), "plato_7");
    }

    #[test]
    fn test_item_id_rejects_empty() {
        assert_eq!(
            ItemId::parse("   "),
            Err(CoreError::InvalidItemId("   ".to_string()))
        );
    }

    #[test]
    fn test_item_id_rejects_path_characters() {
        assert!(ItemId::parse("../admin").is_err());
        assert!(ItemId::parse("1/2").is_err());
        assert!(ItemId::parse("1?x=2").is_err());
    }

    #[test]
    fn test_item_id_from_str() {
        let id: ItemId = "abc-1".parse().unwrap();
        assert_eq!(id.to_string(), "abc-1");
    }

    #[test]
    fn test_item_id_deserialize_validates() {
        let ok: ItemId = serde_json::from_str(r#""15""#).unwrap();
        assert_eq!(ok.as_str(), "15");

        let bad: Result<ItemId, _> = serde_json::from_str(r#""a b""#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_control_id_equality() {
        let a = ControlId::new("add-0");
        let b: ControlId = "add-0".into();
        let c = ControlId::from("add-1".to_string());

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
