//! Incremental construction of `HttpRequest` values.
//!
//! # Design
//! Generated client methods create one `RequestBuilder` per call and feed it
//! the bindings recorded at generation time, in declaration order: path
//! placeholders, query pairs, headers, then the payload. `build` is pure and
//! may be called repeatedly.

use std::fmt::Display;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{Body, HttpMethod, HttpRequest};

/// Characters left unescaped inside a path segment (RFC 3986 unreserved).
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Builder for a single request issued by a generated client.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: HttpMethod,
    base_url: String,
    path: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<Body>,
}

impl RequestBuilder {
    /// Start a request for `path_template` (e.g. `/users/{id}`) relative to
    /// `base_url`. A trailing slash on the base URL is ignored.
    pub fn new(method: HttpMethod, base_url: &str, path_template: &str) -> Self {
        Self {
            method,
            base_url: base_url.trim_end_matches('/').to_string(),
            path: path_template.to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Replace every `{name}` placeholder with the percent-encoded value.
    pub fn path_param(&mut self, name: &str, value: impl Display) -> &mut Self {
        let placeholder = format!("{{{name}}}");
        let encoded = utf8_percent_encode(&value.to_string(), PATH_SEGMENT_ENCODE_SET).to_string();
        self.path = self.path.replace(&placeholder, &encoded);
        self
    }

    pub fn query(&mut self, key: &str, value: impl Display) -> &mut Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Like `query`, but `None` adds nothing.
    pub fn query_opt<V: Display>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.query(key, value);
        }
        self
    }

    /// Append every entry of a map-like parameter as a query pair.
    pub fn query_map<I, K, V>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Display,
        V: Display,
    {
        for (key, value) in entries {
            self.query.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// Set a header. A later header with the same (case-insensitive) name
    /// replaces the earlier one.
    pub fn header(&mut self, name: &str, value: impl Display) -> &mut Self {
        self.headers.retain(|(key, _)| !key.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Use the value's textual form as the request body.
    pub fn body(&mut self, value: impl Display) -> &mut Self {
        self.body = Some(Body::Text(value.to_string()));
        self
    }

    /// Serialize the value as the JSON request body.
    pub fn json_body<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self, ApiError> {
        let json = serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        self.body = Some(Body::Json(json));
        Ok(self)
    }

    /// Append a `multipart/form-data` part.
    pub fn part(&mut self, name: &str, value: impl Display) -> &mut Self {
        match &mut self.body {
            Some(Body::Multipart(parts)) => parts.push((name.to_string(), value.to_string())),
            _ => self.body = Some(Body::Multipart(vec![(name.to_string(), value.to_string())])),
        }
        self
    }

    /// Produce the request. A `content-type` header matching the body is
    /// added unless one was set explicitly.
    pub fn build(&self) -> HttpRequest {
        let mut headers = self.headers.clone();
        if let Some(body) = &self.body {
            if !headers.iter().any(|(key, _)| key.eq_ignore_ascii_case("content-type")) {
                headers.push(("content-type".to_string(), body.content_type()));
            }
        }
        HttpRequest {
            method: self.method,
            path: format!("{}{}", self.base_url, self.path),
            query: self.query.clone(),
            headers,
            body: self.body.clone(),
        }
    }
}
