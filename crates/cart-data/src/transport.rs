//! Transport seam between the client and the host's network stack.

use async_trait::async_trait;
use std::rc::Rc;

use crate::{FetchError, RequestBuilder, Response};

/// Sends a finished request and yields the raw response.
///
/// Futures are not `Send`: transports run on the single-threaded browser
/// event loop.
#[async_trait(?Send)]
pub trait HttpTransport {
    /// Send the request.
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError>;
}

#[async_trait(?Send)]
impl<T: HttpTransport + ?Sized> HttpTransport for Rc<T> {
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        (**self).send(request).await
    }
}
