//! Browser `fetch` transport.

use async_trait::async_trait;
use std::collections::HashMap;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::{FetchError, HttpTransport, RequestBuilder, Response};

/// Transport backed by `window.fetch`, sending same-origin credentials so the
/// session cookie that identifies the cart goes along.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserTransport;

impl BrowserTransport {
    /// Create a new browser transport.
    pub fn new() -> Self {
        Self
    }
}

fn js_error(value: JsValue) -> FetchError {
    FetchError::RequestError(
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    )
}

#[async_trait(?Send)]
impl HttpTransport for BrowserTransport {
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        let window = web_sys::window()
            .ok_or_else(|| FetchError::RequestError("no window available".to_string()))?;

        let init = web_sys::RequestInit::new();
        init.set_method(request.method().as_str());
        init.set_credentials(web_sys::RequestCredentials::SameOrigin);
        if let Some(body) = request.body_bytes() {
            let array = js_sys::Uint8Array::from(body);
            init.set_body(&array);
        }

        let js_request = web_sys::Request::new_with_str_and_init(request.url(), &init)
            .map_err(js_error)?;
        for (key, value) in request.headers() {
            js_request.headers().set(key, value).map_err(js_error)?;
        }

        let value = JsFuture::from(window.fetch_with_request(&js_request))
            .await
            .map_err(js_error)?;
        let js_response: web_sys::Response = value.dyn_into().map_err(js_error)?;

        let status = js_response.status();
        let mut headers = HashMap::new();
        if let Ok(Some(content_type)) = js_response.headers().get("content-type") {
            headers.insert("Content-Type".to_string(), content_type);
        }

        let buffer = JsFuture::from(js_response.array_buffer().map_err(js_error)?)
            .await
            .map_err(js_error)?;
        let body = js_sys::Uint8Array::new(&buffer).to_vec();

        Ok(Response::new(status, headers, body))
    }
}
