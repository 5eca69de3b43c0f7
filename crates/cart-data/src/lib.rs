//! HTTP client utilities for the cart widget.
//!
//! Provides a small builder API for talking to the cart backend with
//! automatic JSON handling. The network itself sits behind
//! [`HttpTransport`]: `BrowserTransport` uses `window.fetch` on `wasm32`,
//! [`mock::MockTransport`] answers from scripted queues in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use cart_data::{FetchClient, BrowserTransport};
//!
//! let client = FetchClient::new(BrowserTransport::new());
//!
//! let status: serde_json::Value = client
//!     .get("/api/get_cart_status")
//!     .send()
//!     .await?
//!     .json()?;
//!
//! client
//!     .post("/api/add_to_cart/42")
//!     .form(&[("cantidad", "1")])
//!     .send()
//!     .await?;
//! ```

mod error;
mod request;
mod response;
mod transport;

#[cfg(target_arch = "wasm32")]
mod browser;
pub mod mock;

pub use error::FetchError;
pub use request::{Method, RequestBuilder, FORM_CONTENT_TYPE};
pub use response::Response;
pub use transport::HttpTransport;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserTransport;

use std::collections::HashMap;
use std::rc::Rc;

/// HTTP client for making requests to the cart backend.
///
/// Cheap to clone: clones share the transport.
#[derive(Clone)]
pub struct FetchClient {
    transport: Rc<dyn HttpTransport>,
    default_headers: HashMap<String, String>,
}

impl std::fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient")
            .field("default_headers", &self.default_headers)
            .finish_non_exhaustive()
    }
}

impl FetchClient {
    /// Create a new HTTP client over a transport.
    pub fn new(transport: impl HttpTransport + 'static) -> Self {
        Self::from_shared(Rc::new(transport))
    }

    /// Create a client over a transport that is also held elsewhere.
    pub fn from_shared(transport: Rc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            default_headers: HashMap::new(),
        }
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Post, url)
    }

    fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder {
        let mut builder = RequestBuilder::new(method, url);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            transport: Rc::clone(&self.transport),
            builder,
        }
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder {
    transport: Rc<dyn HttpTransport>,
    builder: RequestBuilder,
}

impl std::fmt::Debug for ClientRequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientRequestBuilder")
            .field("builder", &self.builder)
            .finish_non_exhaustive()
    }
}

impl ClientRequestBuilder {
    /// Set the request body as form-encoded pairs.
    pub fn form<K, V>(mut self, pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.builder = self.builder.form(pairs);
        self
    }

    /// Set the Accept header.
    pub fn accept(mut self, content_type: impl Into<String>) -> Self {
        self.builder = self.builder.accept(content_type);
        self
    }

    /// Send the request and return the response.
    pub async fn send(self) -> Result<Response, FetchError> {
        self.transport.send(self.builder).await
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, HttpTransport, Method, Response};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;

    #[tokio::test]
    async fn test_client_sends_through_transport() {
        let mock = Rc::new(MockTransport::new());
        mock.reply_json(
            Method::Get,
            "/api/get_cart_status",
            200,
            serde_json::json!({"success": true, "total_items": 1}),
        );

        let client = FetchClient::from_shared(mock.clone());
        let resp = client.get("/api/get_cart_status").send().await.unwrap();

        assert!(resp.is_success());
        assert_eq!(mock.count(Method::Get, "/api/get_cart_status"), 1);
    }

    #[tokio::test]
    async fn test_client_default_headers() {
        let mock = Rc::new(MockTransport::new());
        mock.reply_json(Method::Post, "/api/clear_cart", 200, serde_json::json!({}));

        let client = FetchClient::from_shared(mock.clone())
            .with_default_header("X-Requested-With", "XMLHttpRequest");
        client.post("/api/clear_cart").send().await.unwrap();

        let sent = mock.requests();
        assert_eq!(sent[0].url(), "/api/clear_cart");
        assert_eq!(
            sent[0].headers().get("X-Requested-With").map(String::as_str),
            Some("XMLHttpRequest")
        );
    }

    #[test]
    fn test_form_and_accept_reach_builder() {
        let client = FetchClient::new(MockTransport::new());
        let req = client
            .post("/api/add_to_cart/42")
            .form(&[("cantidad", "2")])
            .accept("application/json");
        assert_eq!(req.builder.body_text(), Some("cantidad=2"));
        assert_eq!(
            req.builder.headers().get("Accept").map(String::as_str),
            Some("application/json")
        );
    }
}
