//! Request and response objects shared by every handler of a pipeline.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::ConfigError;

/// A named aspect of an incoming request that can be validated.
///
/// The set is closed: string keys are parsed into this enum when a validation
/// middleware is built, and an unknown key is a [`ConfigError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequestField {
    /// Parsed request body
    Body,
    /// Query-string parameters
    Query,
    /// Route parameters
    Params,
    /// Parsed cookies
    Cookies,
    /// Verified signed cookies
    SignedCookies,
    /// Request headers
    Headers,
    /// HTTP method
    Method,
    /// Request path
    Path,
    /// Host name
    Hostname,
    /// Remote address
    Ip,
    /// Protocol (`http` or `https`)
    Protocol,
    /// Whether the connection is TLS
    Secure,
    /// Whether the request was issued by `XMLHttpRequest`
    Xhr,
}

impl RequestField {
    /// Every recognized aspect.
    pub const ALL: [RequestField; 13] = [
        RequestField::Body,
        RequestField::Query,
        RequestField::Params,
        RequestField::Cookies,
        RequestField::SignedCookies,
        RequestField::Headers,
        RequestField::Method,
        RequestField::Path,
        RequestField::Hostname,
        RequestField::Ip,
        RequestField::Protocol,
        RequestField::Secure,
        RequestField::Xhr,
    ];

    /// Returns the key callers use to name this aspect.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestField::Body => "body",
            RequestField::Query => "query",
            RequestField::Params => "params",
            RequestField::Cookies => "cookies",
            RequestField::SignedCookies => "signedCookies",
            RequestField::Headers => "headers",
            RequestField::Method => "method",
            RequestField::Path => "path",
            RequestField::Hostname => "hostname",
            RequestField::Ip => "ip",
            RequestField::Protocol => "protocol",
            RequestField::Secure => "secure",
            RequestField::Xhr => "xhr",
        }
    }

    /// Returns the name under which the pre-validation value is kept.
    ///
    /// ```
    /// use request_validator::RequestField;
    ///
    /// assert_eq!(RequestField::Body.shadow_name(), "_body");
    /// ```
    pub fn shadow_name(&self) -> String {
        format!("_{}", self.as_str())
    }
}

impl fmt::Display for RequestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestField {
    type Err = ConfigError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        RequestField::ALL
            .into_iter()
            .find(|field| field.as_str() == key)
            .ok_or_else(|| ConfigError::UnknownField {
                key: key.to_string(),
            })
    }
}

/// An incoming request as seen by pipeline handlers.
///
/// Aspects are stored as JSON values and are mutable: a validation middleware
/// replaces an aspect with its normalized value and keeps the value it
/// validated under the aspect's shadow name (`_body` for `body`).
///
/// # Examples
///
/// ```
/// use request_validator::{Request, RequestField};
/// use serde_json::json;
///
/// let req = Request::new("req-1")
///     .with_field(RequestField::Query, json!({"page": "2"}));
///
/// assert_eq!(req.request_id(), "req-1");
/// assert_eq!(req.query(), Some(&json!({"page": "2"})));
/// assert_eq!(req.get_by_name("_query"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Request {
    request_id: String,
    fields: HashMap<RequestField, Value>,
    originals: HashMap<RequestField, Value>,
}

impl Request {
    /// Creates an empty request with the given request ID.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..Self::default()
        }
    }

    /// Sets an aspect, builder style.
    pub fn with_field(mut self, field: RequestField, value: Value) -> Self {
        self.set(field, value);
        self
    }

    /// Returns the request ID used for log correlation.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the current value of an aspect.
    pub fn get(&self, field: RequestField) -> Option<&Value> {
        self.fields.get(&field)
    }

    /// Sets the current value of an aspect.
    pub fn set(&mut self, field: RequestField, value: Value) {
        self.fields.insert(field, value);
    }

    /// Returns the pre-validation value of an aspect, if it was validated.
    pub fn original(&self, field: RequestField) -> Option<&Value> {
        self.originals.get(&field)
    }

    /// Looks up an aspect by key, including shadow names such as `_body`.
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        match name.strip_prefix('_') {
            Some(shadowed) => self.original(shadowed.parse().ok()?),
            None => self.get(name.parse().ok()?),
        }
    }

    /// Returns the body.
    pub fn body(&self) -> Option<&Value> {
        self.get(RequestField::Body)
    }

    /// Returns the query parameters.
    pub fn query(&self) -> Option<&Value> {
        self.get(RequestField::Query)
    }

    /// Returns the route parameters.
    pub fn params(&self) -> Option<&Value> {
        self.get(RequestField::Params)
    }

    /// Records a successful validation: `original` moves to the shadow slot and
    /// `normalized` becomes the aspect's value.
    pub(crate) fn commit(&mut self, field: RequestField, original: Value, normalized: Value) {
        self.originals.insert(field, original);
        self.fields.insert(field, normalized);
    }
}

/// The response a pipeline builds for a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    status: Option<u16>,
    body: Option<Value>,
}

impl Response {
    /// Creates a response that has not been sent yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status code and ends the response without a body.
    pub fn send_status(&mut self, status: u16) {
        self.status = Some(status);
    }

    /// Sets the status code and a JSON body.
    pub fn json(&mut self, status: u16, body: Value) {
        self.status = Some(status);
        self.body = Some(body);
    }

    /// Returns the status code, once set.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns the JSON body, once set.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Returns `true` once a status has been set.
    pub fn is_sent(&self) -> bool {
        self.status.is_some()
    }
}
