//! Domain types for the cart widget.
//!
//! This crate provides the client-side view of the cart API:
//!
//! - **Identifiers**: `ItemId`, `ControlId`
//! - **Snapshots**: `CartSummary`, `ActionResult`
//! - **Configuration**: `WidgetConfig` with endpoint, DOM and message sections
//!
//! # Example
//!
//! ```rust,ignore
//! use cart_core::prelude::*;
//!
//! let summary: CartSummary = serde_json::from_str(r#"{"success":true,"total_items":3}"#)?;
//! assert_eq!(summary.badge_count()?, 3);
//!
//! let config = WidgetConfig::default();
//! assert_eq!(config.api.add_to_cart_url(&ItemId::parse("42")?), "/api/add_to_cart/42");
//! ```

pub mod config;
pub mod error;
pub mod ids;
pub mod summary;

pub use config::WidgetConfig;
pub use error::CoreError;
pub use ids::{ControlId, ItemId};
pub use summary::{ActionResult, CartSummary, Quantity};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{
        ApiConfig, DomConfig, FeedbackConfig, LogConfig, MessagesConfig, WidgetConfig,
    };
    pub use crate::error::CoreError;
    pub use crate::ids::{ControlId, ItemId};
    pub use crate::summary::{ActionResult, CartSummary, Quantity};
}
