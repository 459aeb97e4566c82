//! Orchestrates introspection output, handlers and rendering.
//!
//! # Overview
//! `Generator::build` folds each method's metadata, in declaration order,
//! through the handler registry into a `MethodBuilder`, finalizes it and
//! collects the results in a `ClassModel`. `Generator::generate` renders that
//! model.
//!
//! # Design
//! Referential checks run before the owning handler: a path placeholder or a
//! bound parameter that the method does not declare fails the whole run with
//! `UnboundParameter`. The first error stops generation; no partial model is
//! returned. Building is a pure function of the descriptor and the registry,
//! so repeated runs produce identical models.

use crate::binder::ensure_parameter_exists;
use crate::config::GenerationTarget;
use crate::error::Result;
use crate::handler::HandlerRegistry;
use crate::introspect::{InterfaceDescriptor, MethodDescriptor};
use crate::metadata::MetadataItem;
use crate::model::{ClassModel, MethodBuilder, MethodModel};
use crate::render::{RenderContext, Renderer, RustRenderer};

#[derive(Debug)]
pub struct Generator<R: Renderer = RustRenderer> {
    registry: HandlerRegistry,
    renderer: R,
}

impl Generator<RustRenderer> {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self {
            registry,
            renderer: RustRenderer,
        }
    }
}

impl Default for Generator<RustRenderer> {
    fn default() -> Self {
        Self::new(HandlerRegistry::standard())
    }
}

impl<R: Renderer> Generator<R> {
    pub fn with_renderer<S: Renderer>(self, renderer: S) -> Generator<S> {
        Generator {
            registry: self.registry,
            renderer,
        }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Build the class model for an interface.
    pub fn build(&self, interface: &InterfaceDescriptor) -> Result<ClassModel> {
        let mut class = ClassModel::new();

        for item in &interface.class_metadata {
            match item {
                MetadataItem::Headers(headers) => class.add_headers(headers.iter().cloned()),
                other => {
                    tracing::warn!(
                        interface = %interface.name,
                        kind = %other.kind(),
                        "ignoring metadata that only applies to methods"
                    );
                }
            }
        }

        for method in &interface.methods {
            class.add_method(self.build_method(method)?);
        }

        tracing::info!(
            interface = %interface.name,
            methods = class.methods().len(),
            "built class model"
        );
        Ok(class)
    }

    fn build_method(&self, method: &MethodDescriptor) -> Result<MethodModel> {
        let parameters = method.parameter_names();
        let mut builder = MethodBuilder::new(&method.name, &method.declaration);

        for item in &method.metadata {
            tracing::debug!(method = %method.name, kind = %item.kind(), "applying metadata");

            if let Some(request) = item.as_request_verb() {
                for placeholder in request.referenced_parameters() {
                    ensure_parameter_exists(&method.name, &parameters, &placeholder)?;
                }
            }
            if let Some(parameter) = item.bound_parameter() {
                ensure_parameter_exists(&method.name, &parameters, parameter)?;
            }

            self.registry
                .dispatch(&method.name, item)?
                .handle(&mut builder, item)?;
        }

        builder.finish()
    }

    /// Build and render a client for `interface`.
    pub fn generate(&self, interface: &InterfaceDescriptor, target: &GenerationTarget) -> Result<String> {
        let class = self.build(interface)?;
        let ctx = RenderContext {
            interface_name: &interface.name,
            uses: &interface.uses,
            target,
        };
        self.renderer.render(&class, &ctx)
    }
}
