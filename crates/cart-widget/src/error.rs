//! Widget error types.

use cart_core::config::MessagesConfig;
use cart_core::CoreError;
use cart_data::FetchError;
use thiserror::Error;

/// Errors raised by cart operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    /// No valid JSON envelope came back: network failure, HTTP error page,
    /// unparseable or malformed body.
    #[error("Transport error: {0}")]
    Transport(#[from] FetchError),

    /// The server answered with `success: false`.
    #[error("Rejected by server: {message}")]
    Application { message: String },

    /// Input rejected before any request was sent.
    #[error("Invalid input: {0}")]
    Core(#[from] CoreError),
}

impl WidgetError {
    /// Create an application error.
    pub fn application(message: impl Into<String>) -> Self {
        Self::Application {
            message: message.into(),
        }
    }

    /// Check for a transport failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Text shown to the user: the prefix plus the server or validation
    /// message, or the generic transport text.
    ///
    /// A blank server message is replaced by `messages.unknown_error`.
    pub fn user_message(&self, prefix: &str, messages: &MessagesConfig) -> String {
        match self {
            Self::Transport(_) => messages.transport_error.clone(),
            Self::Application { message } if message.trim().is_empty() => {
                format!("{}{}", prefix, messages.unknown_error)
            }
            Self::Application { message } => format!("{}{}", prefix, message),
            Self::Core(err) => format!("{}{}", prefix, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_application() {
        let err = WidgetError::application("Plato no encontrado o inactivo");
        assert_eq!(
            err.user_message("Error al añadir al carrito: ", &MessagesConfig::default()),
            "Error al añadir al carrito: Plato no encontrado o inactivo"
        );
    }

    #[test]
    fn test_user_message_blank_server_message_uses_fallback() {
        let messages = MessagesConfig::default();
        for blank in ["", "   "] {
            assert_eq!(
                WidgetError::application(blank).user_message("Error: ", &messages),
                "Error: error desconocido"
            );
        }
    }

    #[test]
    fn test_user_message_transport_uses_generic_text() {
        let err = WidgetError::from(FetchError::RequestError("connection reset".to_string()));
        let messages = MessagesConfig::default();
        assert!(err.is_transport());
        assert_eq!(err.user_message("Error: ", &messages), messages.transport_error);
    }

    #[test]
    fn test_user_message_validation() {
        let err = WidgetError::from(CoreError::InvalidQuantity("-1".to_string()));
        assert_eq!(
            err.user_message("Error: ", &MessagesConfig::default()),
            "Error: Invalid quantity: -1"
        );
    }
}
