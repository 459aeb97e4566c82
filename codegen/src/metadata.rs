//! The closed set of metadata items a trait or method can carry.
//!
//! # Design
//! Each attribute recognized on a trait method becomes one `MetadataItem`.
//! `kind()` gives the item's exact identity, used for the first registry
//! lookup. `is_request_verb()` is the capability tag consulted when no handler
//! is registered for the exact kind.

use std::fmt;

use serde::Serialize;

use crate::binder::path_placeholders;

/// HTTP verb of a request descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpVerb {
    pub const ALL: [HttpVerb; 7] = [
        HttpVerb::Get,
        HttpVerb::Post,
        HttpVerb::Put,
        HttpVerb::Delete,
        HttpVerb::Patch,
        HttpVerb::Head,
        HttpVerb::Options,
    ];

    /// Lower-case name, also the attribute name (`#[get(..)]`).
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "get",
            HttpVerb::Post => "post",
            HttpVerb::Put => "put",
            HttpVerb::Delete => "delete",
            HttpVerb::Patch => "patch",
            HttpVerb::Head => "head",
            HttpVerb::Options => "options",
        }
    }

    /// Variant name of the runtime's `HttpMethod`.
    pub fn variant_name(&self) -> &'static str {
        match self {
            HttpVerb::Get => "Get",
            HttpVerb::Post => "Post",
            HttpVerb::Put => "Put",
            HttpVerb::Delete => "Delete",
            HttpVerb::Patch => "Patch",
            HttpVerb::Head => "Head",
            HttpVerb::Options => "Options",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        HttpVerb::ALL.into_iter().find(|verb| verb.as_str() == name)
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact identity of a metadata item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataKind {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Query,
    QueryMap,
    Part,
    Header,
    Headers,
    Body,
    JsonBody,
    Returns,
}

impl MetadataKind {
    /// Attribute name the kind is written as.
    pub fn attribute_name(&self) -> &'static str {
        match self {
            MetadataKind::Get => "get",
            MetadataKind::Post => "post",
            MetadataKind::Put => "put",
            MetadataKind::Delete => "delete",
            MetadataKind::Patch => "patch",
            MetadataKind::Head => "head",
            MetadataKind::Options => "options",
            MetadataKind::Query => "query",
            MetadataKind::QueryMap => "query_map",
            MetadataKind::Part => "part",
            MetadataKind::Header => "header",
            MetadataKind::Headers => "headers",
            MetadataKind::Body => "body",
            MetadataKind::JsonBody => "json_body",
            MetadataKind::Returns => "returns",
        }
    }
}

impl From<HttpVerb> for MetadataKind {
    fn from(verb: HttpVerb) -> Self {
        match verb {
            HttpVerb::Get => MetadataKind::Get,
            HttpVerb::Post => MetadataKind::Post,
            HttpVerb::Put => MetadataKind::Put,
            HttpVerb::Delete => MetadataKind::Delete,
            HttpVerb::Patch => MetadataKind::Patch,
            HttpVerb::Head => MetadataKind::Head,
            HttpVerb::Options => MetadataKind::Options,
        }
    }
}

impl fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute_name())
    }
}

/// How the response body is turned into the method's success type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnsDirective {
    /// Deserialize the body as JSON.
    Json,
    /// Return the body as a `String`.
    Text,
    /// Return the whole response, whatever its status.
    Raw,
    /// Check the status and discard the body.
    Unit,
}

impl ReturnsDirective {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "json" => Some(ReturnsDirective::Json),
            "text" => Some(ReturnsDirective::Text),
            "raw" => Some(ReturnsDirective::Raw),
            "unit" => Some(ReturnsDirective::Unit),
            _ => None,
        }
    }

    /// Name of the runtime decoder function.
    pub fn decoder(&self) -> &'static str {
        match self {
            ReturnsDirective::Json => "decode_json",
            ReturnsDirective::Text => "decode_text",
            ReturnsDirective::Raw => "decode_raw",
            ReturnsDirective::Unit => "decode_unit",
        }
    }
}

/// Verb plus path template, e.g. `GET /users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestVerb {
    pub verb: HttpVerb,
    pub path: String,
}

impl RequestVerb {
    pub fn new(verb: HttpVerb, path: impl Into<String>) -> Self {
        Self {
            verb,
            path: path.into(),
        }
    }

    /// Parameter names referenced by `{placeholder}`s in the path.
    pub fn referenced_parameters(&self) -> Vec<String> {
        path_placeholders(&self.path)
    }
}

/// One structured directive attached to a trait or one of its methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataItem {
    /// `#[get("/path")]` and the other verbs.
    RequestVerb(RequestVerb),
    /// `#[query("key", var = "param")]`.
    Query { key: String, var: String },
    /// `#[query_map("param")]`: every entry of a map parameter.
    QueryMap { var: String },
    /// `#[part("key", var = "param")]`.
    Part { key: String, var: String },
    /// `#[header("Name", var = "param")]`.
    Header { name: String, var: String },
    /// `#[headers("Name: value", ...)]`.
    Headers(Vec<(String, String)>),
    /// `#[body("param")]`.
    Body { var: String },
    /// `#[json_body("param")]`.
    JsonBody { var: String },
    /// `#[returns(json)]`.
    Returns(ReturnsDirective),
}

impl MetadataItem {
    pub fn kind(&self) -> MetadataKind {
        match self {
            MetadataItem::RequestVerb(request) => request.verb.into(),
            MetadataItem::Query { .. } => MetadataKind::Query,
            MetadataItem::QueryMap { .. } => MetadataKind::QueryMap,
            MetadataItem::Part { .. } => MetadataKind::Part,
            MetadataItem::Header { .. } => MetadataKind::Header,
            MetadataItem::Headers(_) => MetadataKind::Headers,
            MetadataItem::Body { .. } => MetadataKind::Body,
            MetadataItem::JsonBody { .. } => MetadataKind::JsonBody,
            MetadataItem::Returns(_) => MetadataKind::Returns,
        }
    }

    pub fn is_request_verb(&self) -> bool {
        matches!(self, MetadataItem::RequestVerb(_))
    }

    pub fn as_request_verb(&self) -> Option<&RequestVerb> {
        match self {
            MetadataItem::RequestVerb(request) => Some(request),
            _ => None,
        }
    }

    /// The single parameter this item binds, if it binds one by name.
    pub fn bound_parameter(&self) -> Option<&str> {
        match self {
            MetadataItem::Query { var, .. }
            | MetadataItem::QueryMap { var }
            | MetadataItem::Part { var, .. }
            | MetadataItem::Header { var, .. }
            | MetadataItem::Body { var }
            | MetadataItem::JsonBody { var } => Some(var),
            MetadataItem::RequestVerb(_) | MetadataItem::Headers(_) | MetadataItem::Returns(_) => {
                None
            }
        }
    }
}
