//! Per-call request options

use deviceplat_domain::{DevicePlatError, Result};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

/// Body attached to a request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized as JSON with the default `Content-Type`.
    Json(Value),
    /// Raw bytes; the default JSON `Content-Type` is dropped and replaced by
    /// `content_type` when given.
    Binary { bytes: Vec<u8>, content_type: Option<String> },
}

impl RequestBody {
    pub(crate) fn is_binary(&self) -> bool {
        matches!(self, Self::Binary { .. })
    }

    /// Caller-supplied `Content-Type` of a binary body.
    pub(crate) fn content_type(&self) -> Option<&str> {
        match self {
            Self::Binary { content_type, .. } => content_type.as_deref(),
            Self::Json(_) => None,
        }
    }

    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Self::Json(value) => Ok(serde_json::to_vec(value)?),
            Self::Binary { bytes, .. } => Ok(bytes.clone()),
        }
    }
}

/// Method, headers, query and body for a single API call.
///
/// ```
/// use deviceplat_infra::RequestOptions;
/// use reqwest::Method;
///
/// let options = RequestOptions::new()
///     .method(Method::GET)
///     .query("sha256", "abc")
///     .query_opt("filename", None::<&str>)
///     .header("X-Trace", "1");
/// assert_eq!(options.query_pairs().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub(crate) method: Method,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<RequestBody>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self { method: Method::GET, headers: Vec::new(), query: Vec::new(), body: None }
    }
}

impl RequestOptions {
    /// A `GET` with no headers, query or body.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add a header, overriding client defaults of the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a query pair only when `value` is present.
    pub fn query_opt<V: ToString>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| DevicePlatError::Serialization(format!("failed to encode body: {e}")))?;
        self.body = Some(RequestBody::Json(value));
        Ok(self)
    }

    /// Attach a raw binary body.
    pub fn binary(mut self, bytes: impl Into<Vec<u8>>, content_type: Option<&str>) -> Self {
        self.body = Some(RequestBody::Binary {
            bytes: bytes.into(),
            content_type: content_type.map(str::to_string),
        });
        self
    }

    pub fn http_method(&self) -> &Method {
        &self.method
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }
}
