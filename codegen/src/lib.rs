//! Generates HTTP client code from attribute-annotated Rust traits.
//!
//! # Overview
//! A trait such as
//!
//! ```text
//! #[headers("X-Client: retrofit")]
//! trait UserApi {
//!     #[get("/users/{id}")]
//!     #[headers("Accept: application/json")]
//!     fn get_user(&self, id: &str) -> Result<User, ApiError>;
//! }
//! ```
//!
//! is read by the `introspect` module into an `InterfaceDescriptor`. The
//! `Generator` folds every metadata item through a `HandlerRegistry` into a
//! per-method model, validates it and collects a `ClassModel`, which a
//! `Renderer` turns into source for a `UserApiClient<T>` implementing the
//! trait over the `retrofit-core` runtime.
//!
//! # Design
//! - Metadata is a closed enum; handlers are looked up by exact kind first
//!   and by the request-verb capability second.
//! - Every validation error is fatal to the run and names the method.
//! - The same pipeline backs the `retrofit-gen` binary and the
//!   `#[rest_client]` attribute macro.

pub mod attribute;
pub mod binder;
pub mod config;
pub mod error;
pub mod generator;
pub mod handler;
pub mod introspect;
pub mod metadata;
pub mod model;
pub mod render;

pub use config::{GenerationTarget, GeneratorConfig};
pub use error::{GenerateError, Result};
pub use generator::Generator;
pub use handler::{AnnotationHandler, HandlerKey, HandlerRegistry};
pub use introspect::{InterfaceDescriptor, MethodDescriptor, ParameterDescriptor};
pub use metadata::{HttpVerb, MetadataItem, MetadataKind, RequestVerb, ReturnsDirective};
pub use model::{ClassModel, HeaderValue, MethodBuilder, MethodModel, PartBinding, QueryBinding};
pub use render::{RenderContext, Renderer, RustRenderer};
