//! Method and class models.
//!
//! # Design
//! A `MethodBuilder` is filled in by the handlers while a method's metadata is
//! folded in, one item at a time. Single-valued properties (verb, body)
//! reject a second assignment immediately; the two end-of-method invariants
//! (verb present, body and parts exclusive) are checked by `finish`, which
//! yields an immutable `MethodModel`.
//!
//! `ClassModel` is the renderer's input. Its serialized field names are
//! stable.

use serde::Serialize;

use crate::error::{GenerateError, Result};
use crate::metadata::{HttpVerb, ReturnsDirective};

/// Value of a header entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum HeaderValue {
    /// Literal value from `#[headers(..)]`.
    Static(String),
    /// Value taken from the named parameter at call time.
    Param(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum QueryBinding {
    /// One parameter sent under `key`.
    Named { param: String, key: String },
    /// Every entry of a map parameter.
    Map { param: String },
}

impl QueryBinding {
    pub fn param(&self) -> &str {
        match self {
            QueryBinding::Named { param, .. } | QueryBinding::Map { param } => param,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartBinding {
    pub param: String,
    pub key: String,
}

/// Accumulates the request description of one method.
#[derive(Debug, Clone)]
pub struct MethodBuilder {
    name: String,
    declaration: String,
    verb: Option<HttpVerb>,
    path: Option<String>,
    headers: Vec<(String, HeaderValue)>,
    query_bindings: Vec<QueryBinding>,
    part_bindings: Vec<PartBinding>,
    body_binding: Option<String>,
    json_body_binding: Option<String>,
    returns: Option<ReturnsDirective>,
}

impl MethodBuilder {
    pub fn new(name: impl Into<String>, declaration: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declaration: declaration.into(),
            verb: None,
            path: None,
            headers: Vec::new(),
            query_bindings: Vec::new(),
            part_bindings: Vec::new(),
            body_binding: None,
            json_body_binding: None,
            returns: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set verb and path. A method has exactly one request.
    pub fn request(&mut self, verb: HttpVerb, path: impl Into<String>) -> Result<&mut Self> {
        if self.verb.is_some() {
            return Err(GenerateError::DuplicateVerb {
                method: self.name.clone(),
            });
        }
        self.verb = Some(verb);
        self.path = Some(path.into());
        Ok(self)
    }

    /// Append a header. Entries are kept in declaration order, duplicates
    /// included.
    pub fn header(&mut self, name: impl Into<String>, value: HeaderValue) -> &mut Self {
        self.headers.push((name.into(), value));
        self
    }

    pub fn query(&mut self, binding: QueryBinding) -> &mut Self {
        self.query_bindings.push(binding);
        self
    }

    pub fn part(&mut self, param: impl Into<String>, key: impl Into<String>) -> &mut Self {
        self.part_bindings.push(PartBinding {
            param: param.into(),
            key: key.into(),
        });
        self
    }

    pub fn body(&mut self, param: impl Into<String>) -> Result<&mut Self> {
        self.ensure_no_body()?;
        self.body_binding = Some(param.into());
        Ok(self)
    }

    pub fn json_body(&mut self, param: impl Into<String>) -> Result<&mut Self> {
        self.ensure_no_body()?;
        self.json_body_binding = Some(param.into());
        Ok(self)
    }

    pub fn returns(&mut self, directive: ReturnsDirective) -> &mut Self {
        self.returns = Some(directive);
        self
    }

    pub fn has_body(&self) -> bool {
        self.body_binding.is_some() || self.json_body_binding.is_some()
    }

    pub fn has_parts(&self) -> bool {
        !self.part_bindings.is_empty()
    }

    fn ensure_no_body(&self) -> Result<()> {
        if self.has_body() {
            return Err(GenerateError::DuplicateBody {
                method: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Check the end-of-method invariants and freeze the model.
    pub fn finish(self) -> Result<MethodModel> {
        let (Some(verb), Some(path)) = (self.verb, self.path.clone()) else {
            return Err(GenerateError::MissingVerb { method: self.name });
        };
        if self.has_body() && self.has_parts() {
            return Err(GenerateError::ConflictingPayload { method: self.name });
        }
        Ok(MethodModel {
            name: self.name,
            declaration: self.declaration,
            verb,
            path,
            headers: self.headers,
            query_bindings: self.query_bindings,
            part_bindings: self.part_bindings,
            body_binding: self.body_binding,
            json_body_binding: self.json_body_binding,
            returns: self.returns,
        })
    }
}

/// Finalized request description of one method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodModel {
    name: String,
    declaration: String,
    verb: HttpVerb,
    path: String,
    headers: Vec<(String, HeaderValue)>,
    query_bindings: Vec<QueryBinding>,
    part_bindings: Vec<PartBinding>,
    body_binding: Option<String>,
    json_body_binding: Option<String>,
    returns: Option<ReturnsDirective>,
}

impl MethodModel {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The method signature as written in the trait.
    pub fn declaration(&self) -> &str {
        &self.declaration
    }

    pub fn verb(&self) -> HttpVerb {
        self.verb
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &[(String, HeaderValue)] {
        &self.headers
    }

    pub fn query_bindings(&self) -> &[QueryBinding] {
        &self.query_bindings
    }

    pub fn part_bindings(&self) -> &[PartBinding] {
        &self.part_bindings
    }

    pub fn body_binding(&self) -> Option<&str> {
        self.body_binding.as_deref()
    }

    pub fn json_body_binding(&self) -> Option<&str> {
        self.json_body_binding.as_deref()
    }

    pub fn returns(&self) -> Option<ReturnsDirective> {
        self.returns
    }
}

/// Renderer-ready description of a whole trait.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassModel {
    headers: Vec<(String, String)>,
    methods: Vec<MethodModel>,
}

impl ClassModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_headers<I>(&mut self, headers: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.headers.extend(headers);
    }

    pub fn add_method(&mut self, method: MethodModel) {
        self.methods.push(method);
    }

    /// Headers sent by every method, ahead of the method's own headers.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn methods(&self) -> &[MethodModel] {
        &self.methods
    }
}
