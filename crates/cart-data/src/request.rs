//! HTTP request builder.

use std::collections::HashMap;

/// Content type of form-encoded bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// Convert to HTTP method string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// A builder for constructing HTTP requests.
///
/// Transports consume the finished builder through its accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBuilder {
    pub(crate) method: Method,
    pub(crate) url: String,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) body: Option<Vec<u8>>,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body as `application/x-www-form-urlencoded` pairs.
    pub fn form<K, V>(mut self, pairs: &[(K, V)]) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs.iter().map(|(k, v)| (k.as_ref(), v.as_ref())))
            .finish();
        self.headers
            .insert("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string());
        self.body = Some(encoded.into_bytes());
        self
    }

    /// Set the Accept header.
    pub fn accept(self, content_type: impl Into<String>) -> Self {
        self.header("Accept", content_type)
    }

    /// The request method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// The full request URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The request headers.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// The request body, if any.
    pub fn body_bytes(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// The request body as UTF-8 text, if any.
    pub fn body_text(&self) -> Option<&str> {
        self.body
            .as_deref()
            .and_then(|b| std::str::from_utf8(b).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_as_str() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Post.as_str(), "POST");
    }

    #[test]
    fn test_form_body() {
        let req =
            RequestBuilder::new(Method::Post, "/api/add_to_cart/42").form(&[("cantidad", "1")]);
        assert_eq!(req.body_text(), Some("cantidad=1"));
        assert_eq!(
            req.headers().get("Content-Type").map(String::as_str),
            Some(FORM_CONTENT_TYPE)
        );
    }

    #[test]
    fn test_form_body_escapes() {
        let req = RequestBuilder::new(Method::Post, "/x").form(&[("nota", "sin sal & picante")]);
        assert_eq!(req.body_text(), Some("nota=sin+sal+%26+picante"));
    }

    #[test]
    fn test_accept_header() {
        let req = RequestBuilder::new(Method::Get, "/x").accept("application/json");
        assert_eq!(
            req.headers().get("Accept").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_no_body_by_default() {
        let req = RequestBuilder::new(Method::Get, "/api/get_cart_status");
        assert_eq!(req.method(), Method::Get);
        assert_eq!(req.url(), "/api/get_cart_status");
        assert!(req.body_bytes().is_none());
    }
}
