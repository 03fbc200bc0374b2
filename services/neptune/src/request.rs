use crate::action::Action;
use graphsign_core::{Error, Result};
use http::Method;
use serde_json::Value;
use std::collections::HashMap;

/// A request to be signed.
///
/// The payload is a JSON mapping of form parameters (or empty). Whether it
/// ends up in the query string or the request body depends on the HTTP
/// method; see [`SignedRequest::params`].
#[derive(Debug, Clone)]
pub struct SigningRequest {
    /// HTTP method; only GET, POST and DELETE can be signed.
    pub method: Method,
    /// Logical action the request targets.
    pub action: Action,
    /// Query payload as a JSON mapping, or empty.
    pub payload: Value,
    /// Database host, without scheme or port.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Whether the request is dispatched over TLS.
    pub use_tls: bool,
    /// Extra headers merged into the signed header set. Applied after the
    /// base set: on conflict the extra header wins.
    pub extra_headers: HashMap<String, String>,
}

impl SigningRequest {
    /// Create a new signing request with an empty payload and TLS disabled.
    pub fn new(method: Method, action: Action, host: impl Into<String>, port: u16) -> Self {
        Self {
            method,
            action,
            payload: Value::Null,
            host: host.into(),
            port,
            use_tls: false,
            extra_headers: HashMap::new(),
        }
    }

    /// Set the query payload.
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Enable or disable TLS for the dispatched request.
    pub fn with_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    /// Add an extra header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(name.into(), value.into());
        self
    }
}

/// Parse an HTTP method name, case-insensitively, into one of the methods
/// supported by the signing scheme.
pub fn parse_method(method: &str) -> Result<Method> {
    if method.eq_ignore_ascii_case("GET") {
        Ok(Method::GET)
    } else if method.eq_ignore_ascii_case("POST") {
        Ok(Method::POST)
    } else if method.eq_ignore_ascii_case("DELETE") {
        Ok(Method::DELETE)
    } else {
        Err(Error::unsupported_method(format!(
            "cannot sign requests with method {method:?}"
        )))
    }
}

/// A fully signed request, ready to hand to an HTTP dispatcher.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    /// Full request url, e.g. `https://db.example.com:8182/gremlin`.
    pub url: String,
    /// Request headers. Always contains `x-amz-date` and `Authorization`;
    /// contains `X-Amz-Security-Token` iff a session token was supplied and
    /// `content-type` iff the method is POST.
    pub headers: HashMap<String, String>,
    /// The url-encoded request parameters: the query string for GET/DELETE
    /// requests, the form body for POST requests.
    pub params: String,
}
