//! Widget configuration.
//!
//! Every field has a default matching the stock storefront markup, so an
//! empty document (`{}` or an empty TOML file) yields a working config.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;
use crate::ids::ItemId;

/// Placeholder substituted with the item id in endpoint templates.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Complete widget configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Cart API endpoints.
    #[serde(default)]
    pub api: ApiConfig,

    /// DOM contract.
    #[serde(default)]
    pub dom: DomConfig,

    /// Transient feedback on add controls.
    #[serde(default)]
    pub feedback: FeedbackConfig,

    /// User-facing strings.
    #[serde(default)]
    pub messages: MessagesConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

impl WidgetConfig {
    /// Parse a JSON configuration document.
    pub fn from_json(content: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse a TOML configuration document.
    pub fn from_toml(content: &str) -> Result<Self, CoreError> {
        Ok(toml::from_str(content)?)
    }
}

/// Cart API endpoint paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Prefix for all endpoints. Empty means same origin.
    pub base_url: String,
    /// Cart status endpoint.
    pub cart_status: String,
    /// Add-to-cart endpoint template.
    pub add_to_cart: String,
    /// Clear-cart endpoint.
    pub clear_cart: String,
    /// Remove-from-cart endpoint template.
    pub remove_from_cart: String,
    /// Update-quantity endpoint template.
    pub update_quantity: String,
    /// Form field carrying the quantity.
    pub quantity_field: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            cart_status: "/api/get_cart_status".to_string(),
            add_to_cart: "/api/add_to_cart/{id}".to_string(),
            clear_cart: "/api/clear_cart".to_string(),
            remove_from_cart: "/api/remove_from_cart/{id}".to_string(),
            update_quantity: "/api/update_cart_quantity/{id}".to_string(),
            quantity_field: "cantidad".to_string(),
        }
    }
}

impl ApiConfig {
    /// URL of the cart status endpoint.
    pub fn cart_status_url(&self) -> String {
        self.join(&self.cart_status)
    }

    /// URL of the add-to-cart endpoint for an item.
    pub fn add_to_cart_url(&self, item: &ItemId) -> String {
        self.join(&expand(&self.add_to_cart, item))
    }

    /// URL of the clear-cart endpoint.
    pub fn clear_cart_url(&self) -> String {
        self.join(&self.clear_cart)
    }

    /// URL of the remove-from-cart endpoint for an item.
    pub fn remove_from_cart_url(&self, item: &ItemId) -> String {
        self.join(&expand(&self.remove_from_cart, item))
    }

    /// URL of the update-quantity endpoint for an item.
    pub fn update_quantity_url(&self, item: &ItemId) -> String {
        self.join(&expand(&self.update_quantity, item))
    }

    fn join(&self, path: &str) -> String {
        if self.base_url.is_empty() {
            path.to_string()
        } else {
            format!("{}{}", self.base_url.trim_end_matches('/'), path)
        }
    }
}

fn expand(template: &str, item: &ItemId) -> String {
    template.replace(ID_PLACEHOLDER, item.as_str())
}

/// Element ids, selectors and classes the widget binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomConfig {
    /// Id of the item count badge.
    pub badge_id: String,
    /// Utility class that hides an element.
    pub hidden_class: String,
    /// Selector for add-to-cart buttons.
    pub add_button_selector: String,
    /// Id of the clear-cart button.
    pub clear_button_id: String,
    /// Selector for remove-from-cart buttons.
    pub remove_button_selector: String,
    /// Selector for quantity inputs.
    pub quantity_input_selector: String,
    /// Attribute carrying the item id on a control.
    pub item_id_attribute: String,
    /// Class of an add button at rest.
    pub idle_class: String,
    /// Class of an add button while showing feedback.
    pub success_class: String,
}

impl Default for DomConfig {
    fn default() -> Self {
        Self {
            badge_id: "cart-item-count".to_string(),
            hidden_class: "d-none".to_string(),
            add_button_selector: ".add-to-cart-btn".to_string(),
            clear_button_id: "clear-cart-btn".to_string(),
            remove_button_selector: ".remove-from-cart-btn".to_string(),
            quantity_input_selector: ".cart-quantity-input".to_string(),
            item_id_attribute: "data-plato-id".to_string(),
            idle_class: "btn-primary".to_string(),
            success_class: "btn-success".to_string(),
        }
    }
}

/// Transient feedback shown after a successful add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Label shown while feedback is active.
    pub label: String,
    /// How long feedback stays before reverting, in milliseconds.
    pub duration_ms: u64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            label: "¡Añadido!".to_string(),
            duration_ms: 1500,
        }
    }
}

impl FeedbackConfig {
    /// Feedback duration.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// User-facing strings for prompts and alerts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    /// Confirmation prompt before clearing the cart.
    pub confirm_clear: String,
    /// Prefix for add-to-cart failures.
    pub add_error: String,
    /// Prefix for clear-cart failures.
    pub clear_error: String,
    /// Prefix for remove-from-cart failures.
    pub remove_error: String,
    /// Prefix for update-quantity failures.
    pub update_error: String,
    /// Shown when the server could not be reached or answered garbage.
    pub transport_error: String,
    /// Appended to an error prefix when the server gave no message.
    pub unknown_error: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            confirm_clear: "¿Estás seguro de que quieres vaciar todo el carrito?".to_string(),
            add_error: "Error al añadir al carrito: ".to_string(),
            clear_error: "Error al vaciar carrito: ".to_string(),
            remove_error: "Error al eliminar del carrito: ".to_string(),
            update_error: "Error al actualizar la cantidad: ".to_string(),
            transport_error: "No se pudo contactar con el servidor. Inténtalo de nuevo."
                .to_string(),
            unknown_error: "error desconocido".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Minimum level: trace, debug, info, warn or error.
    pub level: String,
    /// Output format: json or human.
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(raw: &str) -> ItemId {
        ItemId::parse(raw).unwrap()
    }

    // === Endpoint Tests ===

    #[test]
    fn test_default_endpoints() {
        let api = ApiConfig::default();
        assert_eq!(api.cart_status_url(), "/api/get_cart_status");
        assert_eq!(api.add_to_cart_url(&item("42")), "/api/add_to_cart/42");
        assert_eq!(api.clear_cart_url(), "/api/clear_cart");
        assert_eq!(api.remove_from_cart_url(&item("7")), "/api/remove_from_cart/7");
        assert_eq!(
            api.update_quantity_url(&item("7")),
            "/api/update_cart_quantity/7"
        );
    }

    #[test]
    fn test_base_url_prefix() {
        let api = ApiConfig {
            base_url: "https://tienda.example/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            api.add_to_cart_url(&item("9")),
            "https://tienda.example/api/add_to_cart/9"
        );
    }

    // === Loading Tests ===

    #[test]
    fn test_empty_json_is_default() {
        let config = WidgetConfig::from_json("{}").unwrap();
        assert_eq!(config, WidgetConfig::default());
    }

    #[test]
    fn test_partial_json_override() {
        let config = WidgetConfig::from_json(
            r#"{"feedback": {"duration_ms": 500}, "dom": {"badge_id": "badge"}}"#,
        )
        .unwrap();
        assert_eq!(config.feedback.duration(), Duration::from_millis(500));
        assert_eq!(config.feedback.label, "¡Añadido!");
        assert_eq!(config.dom.badge_id, "badge");
        assert_eq!(config.dom.hidden_class, "d-none");
    }

    #[test]
    fn test_toml_override() {
        let config = WidgetConfig::from_toml(
            r#"
            [api]
            base_url = "/tienda"

            [messages]
            transport_error = "Sin conexión"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.cart_status_url(), "/tienda/api/get_cart_status");
        assert_eq!(config.messages.transport_error, "Sin conexión");
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let result = WidgetConfig::from_json("{not json");
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn test_default_feedback_duration() {
        assert_eq!(
            FeedbackConfig::default().duration(),
            Duration::from_millis(1500)
        );
    }
}
