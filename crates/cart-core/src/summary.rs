//! Snapshots returned by the cart API.
//!
//! These values live for a single request/response cycle: decoded, used to
//! update the page, then dropped.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Cart status as reported by `GET /api/get_cart_status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    /// Whether the server could compute the summary.
    #[serde(default)]
    pub success: bool,
    /// Sum of quantities across all cart lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<i64>,
    /// Optional server message, present on failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CartSummary {
    /// Item count to display on the badge.
    ///
    /// Only meaningful when `success` is true. A missing or negative
    /// `total_items` is reported as malformed.
    pub fn badge_count(&self) -> Result<u64, CoreError> {
        match self.total_items {
            Some(n) if n >= 0 => Ok(n as u64),
            Some(n) => Err(CoreError::MalformedSummary(format!(
                "negative total_items: {n}"
            ))),
            None => Err(CoreError::MalformedSummary(
                "missing total_items".to_string(),
            )),
        }
    }
}

/// Outcome of a write request (add, clear, remove, update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Whether the server applied the change.
    #[serde(default)]
    pub success: bool,
    /// Human-readable message from the server. Absent or `null` on some
    /// failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Updated count, sent by some endpoints. The widget re-fetches instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<i64>,
}

impl ActionResult {
    /// The server message, if it sent a non-blank one.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.trim().is_empty())
    }
}

/// Number of units sent in a `cantidad` form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    /// A single unit, the default for add-to-cart controls.
    pub const ONE: Quantity = Quantity(1);

    /// Create a quantity without range checks.
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Validate a quantity for adding: must be at least one.
    pub fn for_add(value: u32) -> Result<Self, CoreError> {
        if value == 0 {
            return Err(CoreError::InvalidQuantity(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Parse the value of a quantity input. Accepts non-negative integers.
    pub fn parse_input(raw: &str) -> Result<Self, CoreError> {
        raw.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|_| CoreError::InvalidQuantity(raw.to_string()))
    }

    /// Get the raw value.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Check for zero.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === CartSummary Tests ===

    #[test]
    fn test_summary_decode() {
        let summary: CartSummary =
            serde_json::from_str(r#"{"success": true, "total_items": 3}"#).unwrap();
        assert!(summary.success);
        assert_eq!(summary.badge_count().unwrap(), 3);
    }

    #[test]
    fn test_summary_zero_items() {
        let summary: CartSummary =
            serde_json::from_str(r#"{"success": true, "total_items": 0}"#).unwrap();
        assert_eq!(summary.badge_count().unwrap(), 0);
    }

    #[test]
    fn test_summary_missing_total_is_malformed() {
        let summary: CartSummary = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(matches!(
            summary.badge_count(),
            Err(CoreError::MalformedSummary(_))
        ));
    }

    #[test]
    fn test_summary_negative_total_is_malformed() {
        let summary: CartSummary =
            serde_json::from_str(r#"{"success": true, "total_items": -2}"#).unwrap();
        assert!(summary.badge_count().is_err());
    }

    #[test]
    fn test_summary_failure_with_message() {
        let summary: CartSummary =
            serde_json::from_str(r#"{"success": false, "message": "sin sesión"}"#).unwrap();
        assert!(!summary.success);
        assert_eq!(summary.message.as_deref(), Some("sin sesión"));
    }

    #[test]
    fn test_summary_rejects_non_integer_total() {
        let result: Result<CartSummary, _> =
            serde_json::from_str(r#"{"success": true, "total_items": "many"}"#);
        assert!(result.is_err());
    }

    // === ActionResult Tests ===

    #[test]
    fn test_action_result_with_extra_total() {
        let result: ActionResult = serde_json::from_str(
            r#"{"success": true, "message": "Milanesa agregado al carrito.", "total_items": 4}"#,
        )
        .unwrap();
        assert_eq!(result, ActionResult {
            success: true,
            message: Some("Milanesa agregado al carrito.".to_string()),
            total_items: Some(4),
        });
    }

    #[test]
    fn test_action_result_missing_message() {
        let result: ActionResult = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!result.success);
        assert_eq!(result.message(), None);
    }

    #[test]
    fn test_action_result_null_or_blank_message() {
        let result: ActionResult =
            serde_json::from_str(r#"{"success": false, "message": null}"#).unwrap();
        assert_eq!(result.message, None);

        let result: ActionResult =
            serde_json::from_str(r#"{"success": false, "message": "  "}"#).unwrap();
        assert_eq!(result.message(), None);
    }

    // === Quantity Tests ===

    #[test]
    fn test_quantity_default_is_one() {
        assert_eq!(Quantity::default(), Quantity::ONE);
        assert_eq!(Quantity::default().to_string(), "1");
    }

    #[test]
    fn test_quantity_for_add_rejects_zero() {
        assert!(Quantity::for_add(0).is_err());
        assert_eq!(Quantity::for_add(3).unwrap().get(), 3);
    }

    #[test]
    fn test_quantity_parse_input() {
        assert_eq!(Quantity::parse_input(" 5 ").unwrap().get(), 5);
        assert!(Quantity::parse_input("0").unwrap().is_zero());
        assert!(Quantity::parse_input("-1").is_err());
        assert!(Quantity::parse_input("dos").is_err());
        assert!(Quantity::parse_input("").is_err());
    }
}
