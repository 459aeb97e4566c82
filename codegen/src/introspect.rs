//! Reads annotated traits into descriptors the generator can consume.
//!
//! # Overview
//! An `InterfaceDescriptor` holds the trait name, its class-level metadata,
//! and one `MethodDescriptor` per required method, each with its ordered
//! parameters and ordered metadata items. Nothing here interprets metadata;
//! it is only parsed and collected.
//!
//! # Design
//! Methods with a default body are not part of the HTTP surface and are
//! skipped. Only `&self` methods with plain identifier parameters and a
//! declared return type are accepted.

use quote::ToTokens;
use syn::ext::IdentExt;
use syn::{FnArg, Item, ItemTrait, Pat, ReturnType, TraitItem, TraitItemFn};

use crate::attribute::{is_metadata_attribute, parse_attribute};
use crate::error::{GenerateError, Result};
use crate::metadata::MetadataItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub name: String,
    /// The parameter type, as tokens.
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    /// The full signature, used by the renderer to rebuild the method.
    pub declaration: String,
    pub parameters: Vec<ParameterDescriptor>,
    pub metadata: Vec<MetadataItem>,
}

impl MethodDescriptor {
    /// A descriptor built by hand rather than read from a trait.
    pub fn new(name: impl Into<String>, declaration: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declaration: declaration.into(),
            parameters: Vec::new(),
            metadata: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.parameters.push(ParameterDescriptor {
            name: name.into(),
            ty: ty.into(),
        });
        self
    }

    pub fn with_metadata(mut self, item: MetadataItem) -> Self {
        self.metadata.push(item);
        self
    }

    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    pub name: String,
    pub class_metadata: Vec<MetadataItem>,
    pub methods: Vec<MethodDescriptor>,
    /// `use` items found next to the trait, as source text.
    pub uses: Vec<String>,
}

impl InterfaceDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class_metadata: Vec::new(),
            methods: Vec::new(),
            uses: Vec::new(),
        }
    }

    pub fn with_class_metadata(mut self, item: MetadataItem) -> Self {
        self.class_metadata.push(item);
        self
    }

    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// Describe a parsed trait.
    pub fn from_trait(item: &ItemTrait) -> Result<Self> {
        let name = item.ident.unraw().to_string();
        if !item.generics.params.is_empty() {
            return Err(GenerateError::UnsupportedInterface {
                interface: name,
                reason: "generic traits cannot be implemented by a generated client".to_string(),
            });
        }

        let class_metadata = parse_metadata(&name, &item.attrs)?;
        let mut methods = Vec::new();
        for trait_item in &item.items {
            match trait_item {
                TraitItem::Fn(method) if method.default.is_none() => {
                    methods.push(describe_method(method)?);
                }
                TraitItem::Fn(method) => {
                    tracing::debug!(method = %method.sig.ident, "skipping method with a default body");
                }
                other => {
                    tracing::debug!(item = %other.to_token_stream(), "skipping non-method trait item");
                }
            }
        }

        Ok(Self {
            name,
            class_metadata,
            methods,
            uses: Vec::new(),
        })
    }

    /// Parse a source file and describe the trait called `name`, or the only
    /// trait carrying metadata when `name` is `None`.
    pub fn from_source(source: &str, name: Option<&str>) -> Result<Self> {
        let file = syn::parse_file(source)?;
        let uses: Vec<String> = file
            .items
            .iter()
            .filter_map(|item| match item {
                Item::Use(item_use) => Some(item_use.to_token_stream().to_string()),
                _ => None,
            })
            .collect();

        let traits: Vec<&ItemTrait> = file
            .items
            .iter()
            .filter_map(|item| match item {
                Item::Trait(item_trait) => Some(item_trait),
                _ => None,
            })
            .collect();

        let found = match name {
            Some(name) => traits
                .into_iter()
                .find(|t| t.ident.unraw() == name)
                .ok_or_else(|| GenerateError::InterfaceNotFound(format!("`{name}`")))?,
            None => {
                let annotated: Vec<&ItemTrait> = traits
                    .into_iter()
                    .filter(|t| carries_metadata(t))
                    .collect();
                match annotated.as_slice() {
                    [only] => *only,
                    [] => {
                        return Err(GenerateError::InterfaceNotFound(
                            "with retrofit metadata".to_string(),
                        ))
                    }
                    many => {
                        return Err(GenerateError::AmbiguousInterface(
                            many.iter().map(|t| t.ident.to_string()).collect(),
                        ))
                    }
                }
            }
        };

        let mut descriptor = Self::from_trait(found)?;
        descriptor.uses = uses;
        Ok(descriptor)
    }
}

fn carries_metadata(item: &ItemTrait) -> bool {
    item.attrs.iter().any(is_metadata_attribute)
        || item.items.iter().any(|trait_item| match trait_item {
            TraitItem::Fn(method) => method.attrs.iter().any(is_metadata_attribute),
            _ => false,
        })
}

fn parse_metadata(owner: &str, attrs: &[syn::Attribute]) -> Result<Vec<MetadataItem>> {
    let mut items = Vec::new();
    for attr in attrs {
        let parsed = parse_attribute(attr).map_err(|source| GenerateError::InvalidAttribute {
            item: owner.to_string(),
            source,
        })?;
        if let Some(item) = parsed {
            items.push(item);
        }
    }
    Ok(items)
}

fn describe_method(method: &TraitItemFn) -> Result<MethodDescriptor> {
    let sig = &method.sig;
    let name = sig.ident.unraw().to_string();
    let unsupported = |reason: &str| GenerateError::UnsupportedSignature {
        method: name.clone(),
        reason: reason.to_string(),
    };

    if sig.asyncness.is_some() {
        return Err(unsupported("async methods are not supported"));
    }
    if matches!(sig.output, ReturnType::Default) {
        return Err(unsupported("a return type is required"));
    }

    let mut inputs = sig.inputs.iter();
    match inputs.next() {
        Some(FnArg::Receiver(receiver))
            if receiver.reference.is_some() && receiver.mutability.is_none() => {}
        _ => return Err(unsupported("the first parameter must be `&self`")),
    }

    let mut parameters = Vec::new();
    for input in inputs {
        let FnArg::Typed(typed) = input else {
            return Err(unsupported("unexpected receiver"));
        };
        let Pat::Ident(pat) = typed.pat.as_ref() else {
            return Err(unsupported("parameters must be plain identifiers"));
        };
        parameters.push(ParameterDescriptor {
            name: pat.ident.unraw().to_string(),
            ty: typed.ty.to_token_stream().to_string(),
        });
    }

    Ok(MethodDescriptor {
        metadata: parse_metadata(&name, &method.attrs)?,
        declaration: sig.to_token_stream().to_string(),
        name,
        parameters,
    })
}

/// Remove retrofit attributes from a trait and its methods, leaving every
/// other attribute in place.
pub fn strip_metadata_attributes(item: &mut ItemTrait) {
    item.attrs.retain(|attr| !is_metadata_attribute(attr));
    for trait_item in &mut item.items {
        if let TraitItem::Fn(method) = trait_item {
            method.attrs.retain(|attr| !is_metadata_attribute(attr));
        }
    }
}
