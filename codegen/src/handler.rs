//! Annotation handlers and the registry that dispatches to them.
//!
//! # Design
//! A handler folds one kind of metadata item into a `MethodBuilder`. The
//! registry is an immutable map built once and injected into the
//! `Generator`. Lookup is exact kind first; when no handler registered for
//! the exact kind applies to the item, items carrying the request-verb
//! capability fall back to the handler registered under
//! `HandlerKey::RequestVerb`. Anything else is an `UnknownAnnotation` error.

use std::collections::HashMap;
use std::fmt;

use crate::error::{GenerateError, Result};
use crate::metadata::{MetadataItem, MetadataKind};
use crate::model::{HeaderValue, MethodBuilder, QueryBinding};

/// Interprets one kind of metadata item.
pub trait AnnotationHandler: Send + Sync {
    fn applies(&self, item: &MetadataItem) -> bool;

    fn handle(&self, method: &mut MethodBuilder, item: &MetadataItem) -> Result<()>;
}

fn mismatch(method: &MethodBuilder, item: &MetadataItem) -> GenerateError {
    GenerateError::UnknownAnnotation {
        method: method.name().to_string(),
        kind: item.kind(),
    }
}

/// Sets the verb and path.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestVerbHandler;

impl AnnotationHandler for RequestVerbHandler {
    fn applies(&self, item: &MetadataItem) -> bool {
        item.is_request_verb()
    }

    fn handle(&self, method: &mut MethodBuilder, item: &MetadataItem) -> Result<()> {
        let Some(request) = item.as_request_verb() else {
            return Err(mismatch(method, item));
        };
        method.request(request.verb, request.path.clone())?;
        Ok(())
    }
}

/// Adds a header whose value comes from a parameter.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaderHandler;

impl AnnotationHandler for HeaderHandler {
    fn applies(&self, item: &MetadataItem) -> bool {
        matches!(item, MetadataItem::Header { .. })
    }

    fn handle(&self, method: &mut MethodBuilder, item: &MetadataItem) -> Result<()> {
        let MetadataItem::Header { name, var } = item else {
            return Err(mismatch(method, item));
        };
        method.header(name.clone(), HeaderValue::Param(var.clone()));
        Ok(())
    }
}

/// Adds a block of literal headers.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadersHandler;

impl AnnotationHandler for HeadersHandler {
    fn applies(&self, item: &MetadataItem) -> bool {
        matches!(item, MetadataItem::Headers(_))
    }

    fn handle(&self, method: &mut MethodBuilder, item: &MetadataItem) -> Result<()> {
        let MetadataItem::Headers(headers) = item else {
            return Err(mismatch(method, item));
        };
        for (name, value) in headers {
            method.header(name.clone(), HeaderValue::Static(value.clone()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct QueryHandler;

impl AnnotationHandler for QueryHandler {
    fn applies(&self, item: &MetadataItem) -> bool {
        matches!(item, MetadataItem::Query { .. })
    }

    fn handle(&self, method: &mut MethodBuilder, item: &MetadataItem) -> Result<()> {
        let MetadataItem::Query { key, var } = item else {
            return Err(mismatch(method, item));
        };
        method.query(QueryBinding::Named {
            param: var.clone(),
            key: key.clone(),
        });
        Ok(())
    }
}

/// Binds a whole map parameter; its entries are expanded when the request
/// is built.
#[derive(Debug, Default, Clone, Copy)]
pub struct QueryMapHandler;

impl AnnotationHandler for QueryMapHandler {
    fn applies(&self, item: &MetadataItem) -> bool {
        matches!(item, MetadataItem::QueryMap { .. })
    }

    fn handle(&self, method: &mut MethodBuilder, item: &MetadataItem) -> Result<()> {
        let MetadataItem::QueryMap { var } = item else {
            return Err(mismatch(method, item));
        };
        method.query(QueryBinding::Map { param: var.clone() });
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PartHandler;

impl AnnotationHandler for PartHandler {
    fn applies(&self, item: &MetadataItem) -> bool {
        matches!(item, MetadataItem::Part { .. })
    }

    fn handle(&self, method: &mut MethodBuilder, item: &MetadataItem) -> Result<()> {
        let MetadataItem::Part { key, var } = item else {
            return Err(mismatch(method, item));
        };
        method.part(var.clone(), key.clone());
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BodyHandler;

impl AnnotationHandler for BodyHandler {
    fn applies(&self, item: &MetadataItem) -> bool {
        matches!(item, MetadataItem::Body { .. })
    }

    fn handle(&self, method: &mut MethodBuilder, item: &MetadataItem) -> Result<()> {
        let MetadataItem::Body { var } = item else {
            return Err(mismatch(method, item));
        };
        method.body(var.clone())?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonBodyHandler;

impl AnnotationHandler for JsonBodyHandler {
    fn applies(&self, item: &MetadataItem) -> bool {
        matches!(item, MetadataItem::JsonBody { .. })
    }

    fn handle(&self, method: &mut MethodBuilder, item: &MetadataItem) -> Result<()> {
        let MetadataItem::JsonBody { var } = item else {
            return Err(mismatch(method, item));
        };
        method.json_body(var.clone())?;
        Ok(())
    }
}

/// Records how the response is decoded.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReturnsHandler;

impl AnnotationHandler for ReturnsHandler {
    fn applies(&self, item: &MetadataItem) -> bool {
        matches!(item, MetadataItem::Returns(_))
    }

    fn handle(&self, method: &mut MethodBuilder, item: &MetadataItem) -> Result<()> {
        let MetadataItem::Returns(directive) = item else {
            return Err(mismatch(method, item));
        };
        method.returns(*directive);
        Ok(())
    }
}

/// Registry key: an exact metadata kind, or the request-verb capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKey {
    Kind(MetadataKind),
    RequestVerb,
}

/// Immutable mapping from metadata kind to handler.
pub struct HandlerRegistry {
    handlers: HashMap<HandlerKey, Box<dyn AnnotationHandler>>,
}

impl HandlerRegistry {
    /// A registry with no handlers; every dispatch fails.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Every built-in handler. Verbs are served through the request-verb
    /// capability rather than per-verb entries.
    pub fn standard() -> Self {
        Self::empty()
            .with_handler(HandlerKey::RequestVerb, RequestVerbHandler)
            .with_handler(HandlerKey::Kind(MetadataKind::Query), QueryHandler)
            .with_handler(HandlerKey::Kind(MetadataKind::QueryMap), QueryMapHandler)
            .with_handler(HandlerKey::Kind(MetadataKind::Part), PartHandler)
            .with_handler(HandlerKey::Kind(MetadataKind::Header), HeaderHandler)
            .with_handler(HandlerKey::Kind(MetadataKind::Headers), HeadersHandler)
            .with_handler(HandlerKey::Kind(MetadataKind::Body), BodyHandler)
            .with_handler(HandlerKey::Kind(MetadataKind::JsonBody), JsonBodyHandler)
            .with_handler(HandlerKey::Kind(MetadataKind::Returns), ReturnsHandler)
    }

    /// Register `handler` under `key`, replacing any previous entry.
    pub fn with_handler(mut self, key: HandlerKey, handler: impl AnnotationHandler + 'static) -> Self {
        self.handlers.insert(key, Box::new(handler));
        self
    }

    /// Find the handler for `item`, which belongs to `method`.
    pub fn dispatch(&self, method: &str, item: &MetadataItem) -> Result<&dyn AnnotationHandler> {
        let applicable = |key: HandlerKey| {
            self.handlers
                .get(&key)
                .map(|handler| &**handler)
                .filter(|handler| handler.applies(item))
        };
        applicable(HandlerKey::Kind(item.kind()))
            .or_else(|| {
                item.is_request_verb()
                    .then(|| applicable(HandlerKey::RequestVerb))
                    .flatten()
            })
            .ok_or_else(|| GenerateError::UnknownAnnotation {
                method: method.to_string(),
                kind: item.kind(),
            })
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("keys", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
