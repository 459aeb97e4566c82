//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. Generated
//! clients build `HttpRequest` values and decode `HttpResponse` values without
//! ever touching the network; the injected `Transport` is responsible for the
//! actual I/O.
//!
//! All fields use owned types (`String`, `Vec`) so values can be handed to any
//! transport without lifetime concerns.

use std::fmt;
use std::str::FromStr;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left unescaped in query keys and values (RFC 3986 unreserved).
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Preferred boundary for `multipart/form-data` bodies. A numeric suffix is
/// added when a part already contains it; see `Body::boundary`.
pub const MULTIPART_BOUNDARY: &str = "retrofit-multipart-boundary";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    /// Upper-case wire name, e.g. `"GET"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown method name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown HTTP method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            "PATCH" => Ok(HttpMethod::Patch),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Raw text sent as-is.
    Text(String),
    /// A serialized JSON document.
    Json(String),
    /// Named `multipart/form-data` parts, in declaration order.
    Multipart(Vec<(String, String)>),
}

impl Body {
    /// Value for the `content-type` header.
    pub fn content_type(&self) -> String {
        match self {
            Body::Text(_) => "text/plain; charset=utf-8".to_string(),
            Body::Json(_) => "application/json".to_string(),
            Body::Multipart(_) => format!("multipart/form-data; boundary={}", self.boundary()),
        }
    }

    /// Multipart boundary for this body: `MULTIPART_BOUNDARY`, or the first
    /// `MULTIPART_BOUNDARY-<n>` that no part name or value contains. Always
    /// the base constant for text and JSON bodies.
    pub fn boundary(&self) -> String {
        let Body::Multipart(parts) = self else {
            return MULTIPART_BOUNDARY.to_string();
        };
        let collides = |candidate: &str| {
            parts
                .iter()
                .any(|(name, value)| name.contains(candidate) || value.contains(candidate))
        };
        let mut candidate = MULTIPART_BOUNDARY.to_string();
        let mut n = 0u32;
        while collides(&candidate) {
            n += 1;
            candidate = format!("{MULTIPART_BOUNDARY}-{n}");
        }
        candidate
    }

    /// Wire representation of the payload.
    pub fn encode(&self) -> String {
        match self {
            Body::Text(text) | Body::Json(text) => text.clone(),
            Body::Multipart(parts) => {
                let boundary = self.boundary();
                let mut out = String::new();
                for (name, value) in parts {
                    out.push_str(&format!("--{boundary}\r\n"));
                    out.push_str(&format!(
                        "content-disposition: form-data; name=\"{name}\"\r\n\r\n"
                    ));
                    out.push_str(value);
                    out.push_str("\r\n");
                }
                out.push_str(&format!("--{boundary}--\r\n"));
                out
            }
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by generated clients through `RequestBuilder`. The transport is
/// responsible for executing it and returning the corresponding
/// `HttpResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Base URL joined with the expanded path template, without query string.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Body>,
}

impl HttpRequest {
    /// Full URL including the percent-encoded query string.
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(key, QUERY_ENCODE_SET),
                    utf8_percent_encode(value, QUERY_ENCODE_SET)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after executing an `HttpRequest`, then
/// decoded by the generated client according to the method's returns
/// directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
