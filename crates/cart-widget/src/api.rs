//! Typed client for the cart endpoints.

use cart_core::config::ApiConfig;
use cart_core::{ActionResult, CartSummary, CoreError, ItemId, Quantity};
use cart_data::{FetchClient, FetchError, Response};
use serde::de::DeserializeOwned;

use crate::error::WidgetError;

/// Client for the cart API.
///
/// Every call yields either the decoded success payload, an
/// `Application` error carrying the server message, or a `Transport` error.
#[derive(Debug, Clone)]
pub struct CartApi {
    client: FetchClient,
    config: ApiConfig,
}

impl CartApi {
    /// Create an API client.
    pub fn new(client: FetchClient, config: ApiConfig) -> Self {
        Self { client, config }
    }

    /// Endpoint configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Fetch the number of items in the cart.
    pub async fn cart_status(&self) -> Result<u64, WidgetError> {
        let response = self
            .client
            .get(self.config.cart_status_url())
            .accept("application/json")
            .send()
            .await?;
        let summary: CartSummary = decode_envelope(response)?;

        if !summary.success {
            return Err(WidgetError::application(
                summary.message.unwrap_or_default(),
            ));
        }

        summary.badge_count().map_err(|e| match e {
            CoreError::MalformedSummary(detail) => FetchError::ParseError(detail).into(),
            other => other.into(),
        })
    }

    /// Add units of an item. Returns the server message.
    pub async fn add_to_cart(
        &self,
        item: &ItemId,
        quantity: Quantity,
    ) -> Result<String, WidgetError> {
        let url = self.config.add_to_cart_url(item);
        self.post_action(url, Some(quantity)).await
    }

    /// Empty the cart. Returns the server message.
    pub async fn clear_cart(&self) -> Result<String, WidgetError> {
        let url = self.config.clear_cart_url();
        self.post_action(url, None).await
    }

    /// Remove an item line. Returns the server message.
    pub async fn remove_from_cart(&self, item: &ItemId) -> Result<String, WidgetError> {
        let url = self.config.remove_from_cart_url(item);
        self.post_action(url, None).await
    }

    /// Set the quantity of an item line; zero removes it. Returns the server
    /// message.
    pub async fn update_quantity(
        &self,
        item: &ItemId,
        quantity: Quantity,
    ) -> Result<String, WidgetError> {
        let url = self.config.update_quantity_url(item);
        self.post_action(url, Some(quantity)).await
    }

    async fn post_action(
        &self,
        url: String,
        quantity: Option<Quantity>,
    ) -> Result<String, WidgetError> {
        let mut request = self.client.post(url).accept("application/json");
        if let Some(quantity) = quantity {
            request = request.form(&[(self.config.quantity_field.as_str(), quantity.to_string())]);
        }

        let result: ActionResult = decode_envelope(request.send().await?)?;
        let message = result.message().unwrap_or_default().to_string();
        if result.success {
            Ok(message)
        } else {
            Err(WidgetError::application(message))
        }
    }
}

/// Decode a JSON envelope whatever the status code.
///
/// The backend reports rejections as 4xx with a JSON body, so the body wins
/// over the status. Only an undecodable body on a non-2xx status becomes an
/// `HttpError`.
fn decode_envelope<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    match response.json() {
        Ok(value) => Ok(value),
        Err(err) => {
            response.error_for_status()?;
            Err(err)
        }
    }
}
