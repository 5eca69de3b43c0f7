//! Scripted in-memory transport (for development/testing).

use async_trait::async_trait;
use futures::channel::oneshot;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use crate::{FetchError, HttpTransport, Method, RequestBuilder, Response};

enum Reply {
    Ready(Result<Response, FetchError>),
    Deferred(oneshot::Receiver<Result<Response, FetchError>>),
}

/// Transport answering from per-route queues and recording every request.
///
/// Each `(method, url)` route holds a FIFO of replies. Requests to a route
/// with an empty queue fail with `FetchError::RequestError`.
#[derive(Default)]
pub struct MockTransport {
    routes: RefCell<HashMap<(Method, String), VecDeque<Reply>>>,
    requests: RefCell<Vec<RequestBuilder>>,
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("requests", &self.requests.borrow().len())
            .finish()
    }
}

impl MockTransport {
    /// Create an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON reply for a route.
    pub fn reply_json(&self, method: Method, url: &str, status: u16, body: serde_json::Value) {
        self.push(method, url, Reply::Ready(Ok(Response::json_body(status, &body))));
    }

    /// Queue a raw reply for a route.
    pub fn reply(&self, method: Method, url: &str, response: Response) {
        self.push(method, url, Reply::Ready(Ok(response)));
    }

    /// Queue a transport failure for a route.
    pub fn fail(&self, method: Method, url: &str, error: FetchError) {
        self.push(method, url, Reply::Ready(Err(error)));
    }

    /// Queue a reply that resolves only when the returned sender fires.
    ///
    /// Dropping the sender without sending leaves the request pending forever.
    pub fn defer(
        &self,
        method: Method,
        url: &str,
    ) -> oneshot::Sender<Result<Response, FetchError>> {
        let (tx, rx) = oneshot::channel();
        self.push(method, url, Reply::Deferred(rx));
        tx
    }

    /// All requests sent so far, in order.
    pub fn requests(&self) -> Vec<RequestBuilder> {
        self.requests.borrow().clone()
    }

    /// Number of requests sent to a route.
    pub fn count(&self, method: Method, url: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method() == method && r.url() == url)
            .count()
    }

    fn push(&self, method: Method, url: &str, reply: Reply) {
        self.routes
            .borrow_mut()
            .entry((method, url.to_string()))
            .or_default()
            .push_back(reply);
    }
}

#[async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
        let key = (request.method(), request.url().to_string());
        self.requests.borrow_mut().push(request);

        // Release the borrow before awaiting a deferred reply.
        let reply = self
            .routes
            .borrow_mut()
            .get_mut(&key)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Deferred(rx)) => match rx.await {
                Ok(result) => result,
                Err(_) => futures::future::pending::<Result<Response, FetchError>>().await,
            },
            None => Err(FetchError::RequestError(format!(
                "no scripted reply for {} {}",
                key.0.as_str(),
                key.1
            ))),
        }
    }
}
