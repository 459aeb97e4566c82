//! Errors raised while turning an annotated trait into a client.
//!
//! # Design
//! Every variant is fatal to the current generation run: generation is
//! deterministic, so retrying would reproduce the same error. Variants that
//! concern a single method carry its name so the caller can report an
//! actionable message.

use crate::metadata::MetadataKind;

/// Errors returned by the introspector, the generator and the renderer.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The registry has no handler for the metadata item's kind.
    #[error("method `{method}`: no handler registered for #[{kind}] metadata")]
    UnknownAnnotation { method: String, kind: MetadataKind },

    /// Metadata references a parameter the method does not declare.
    #[error("method `{method}`: parameter `{parameter}` not found")]
    UnboundParameter { method: String, parameter: String },

    #[error("method `{method}`: request method is declared more than once")]
    DuplicateVerb { method: String },

    #[error("method `{method}`: request body is declared more than once")]
    DuplicateBody { method: String },

    #[error("method `{method}`: Request method must be set")]
    MissingVerb { method: String },

    #[error("method `{method}`: Body and part cannot both be set")]
    ConflictingPayload { method: String },

    /// A retrofit attribute could not be parsed.
    #[error("`{item}`: invalid attribute: {source}")]
    InvalidAttribute {
        item: String,
        #[source]
        source: syn::Error,
    },

    #[error("method `{method}`: unsupported signature: {reason}")]
    UnsupportedSignature { method: String, reason: String },

    #[error("trait `{interface}` is not supported: {reason}")]
    UnsupportedInterface { interface: String, reason: String },

    #[error("no trait {0} found in source")]
    InterfaceNotFound(String),

    #[error("several traits carry retrofit metadata ({}); name one explicitly", .0.join(", "))]
    AmbiguousInterface(Vec<String>),

    /// The input is not valid Rust.
    #[error("failed to parse source: {0}")]
    Parse(#[from] syn::Error),

    /// A method declaration could not be parsed back by the renderer.
    #[error("method `{method}`: invalid declaration `{declaration}`: {reason}")]
    InvalidDeclaration {
        method: String,
        declaration: String,
        reason: String,
    },

    /// The renderer produced tokens that are not a valid Rust file.
    #[error("generated code is not valid Rust: {0}")]
    Render(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GenerateError {
    /// Name of the method the error is attributed to, if any.
    pub fn method(&self) -> Option<&str> {
        match self {
            GenerateError::UnknownAnnotation { method, .. }
            | GenerateError::UnboundParameter { method, .. }
            | GenerateError::DuplicateVerb { method }
            | GenerateError::DuplicateBody { method }
            | GenerateError::MissingVerb { method }
            | GenerateError::ConflictingPayload { method }
            | GenerateError::UnsupportedSignature { method, .. }
            | GenerateError::InvalidDeclaration { method, .. } => Some(method),
            GenerateError::InvalidAttribute { item, .. } => Some(item),
            _ => None,
        }
    }

    /// Convert into a `syn::Error`, keeping the original span when the error
    /// came from parsing and using `span` otherwise.
    pub fn into_syn_error(self, span: proc_macro2::Span) -> syn::Error {
        match self {
            GenerateError::InvalidAttribute { item, source } => {
                syn::Error::new(source.span(), format!("`{item}`: {source}"))
            }
            GenerateError::Parse(source) => source,
            other => syn::Error::new(span, other.to_string()),
        }
    }
}

pub type Result<T, E = GenerateError> = std::result::Result<T, E>;
