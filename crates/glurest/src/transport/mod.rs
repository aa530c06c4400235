//! Transports carry requests to the console.
//!
//! [`Transport`] is the seam between [`crate::Client`] and the wire. The
//! production implementation is [`http::UreqTransport`]. Transports return
//! every response as-is, error statuses included; classifying them is the
//! client's job.
//!
//! # Testing
//!
//! Use [`MockTransport`] to script console responses:
//!
//! ```
//! use glurest::transport::{Method, MockTransport, Request, Response, Transport};
//!
//! let mock = MockTransport::new();
//! mock.respond(Method::Head, "plans/1/execution/1",
//!     Response::new(200).with_header("x-glu-completion", "100:COMPLETED"));
//!
//! let response = mock.execute(&Request::new(Method::Head, "plans/1/execution/1")).unwrap();
//! assert_eq!(response.header("X-GLU-Completion"), Some("100:COMPLETED"));
//! ```

pub mod http;

use crate::error::{Error, Result};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex};

/// HTTP methods the console API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// HEAD
    Head,
    /// POST
    Post,
}

impl Method {
    /// Uppercase method name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request relative to the fabric root (`.../rest/<version>/<fabric>/`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Path (and query) relative to the fabric root, e.g. `plans`.
    pub path: String,
    /// Request body, if any.
    pub body: Option<Vec<u8>>,
    /// `Content-Type` of the body.
    pub content_type: Option<String>,
}

impl Request {
    /// Create a request without a body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            content_type: None,
        }
    }

    /// Attach a body and its content type.
    pub fn body(mut self, content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.content_type = Some(content_type.into());
        self.body = Some(body.into());
        self
    }
}

/// A response as received from the console.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase for the status.
    pub reason: String,
    /// Headers, names lowercased.
    pub headers: HashMap<String, String>,
    /// Body, decoded as UTF-8.
    pub body: String,
}

impl Response {
    /// Create an empty response with the given status.
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    /// Set the reason phrase.
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Add a header.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Look up a header, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Sends requests to the console.
pub trait Transport: Send + Sync {
    /// Execute a request and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns `Error::Http` only when no response was received. Error
    /// statuses are returned as ordinary responses.
    fn execute(&self, request: &Request) -> Result<Response>;
}

/// In-memory transport for tests.
///
/// Responses are queued per `(method, path)` and served in order; the last
/// one queued for a route is repeated once the queue is down to it. Every
/// request is recorded.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    routes: Arc<Mutex<HashMap<(Method, String), VecDeque<Response>>>>,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl MockTransport {
    /// Create a mock with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for a route.
    pub fn respond(&self, method: Method, path: impl Into<String>, response: Response) {
        let mut routes = self.routes.lock().unwrap();
        routes
            .entry((method, path.into()))
            .or_default()
            .push_back(response);
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received for a route.
    #[must_use]
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: &Request) -> Result<Response> {
        self.requests.lock().unwrap().push(request.clone());

        let mut routes = self.routes.lock().unwrap();
        let queue = routes
            .get_mut(&(request.method, request.path.clone()))
            .ok_or_else(|| {
                Error::Http(format!(
                    "mock route not configured: {} {}",
                    request.method, request.path
                ))
            })?;

        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response.ok_or_else(|| Error::Http(format!("mock route exhausted: {}", request.path)))
    }
}
