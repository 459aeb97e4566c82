//! Turns a `ClassModel` into Rust source for a client type.
//!
//! # Overview
//! For a trait `UserApi` the renderer emits
//!
//! ```text
//! pub struct UserApiClient<T> { base_url: String, transport: T }
//! impl<T: Transport> UserApi for UserApiClient<T> { ... }
//! ```
//!
//! where every method builds a request with the runtime's `RequestBuilder`,
//! hands it to the transport and decodes the response.
//!
//! # Design
//! The renderer only reads the model. Each method's declaration is parsed
//! back into a `syn::Signature` so the generated impl repeats it exactly, and
//! the parameter names bound in the model are resolved against it. Class
//! headers are set before method headers; the runtime builder lets a later
//! header replace an earlier one of the same name.

use std::collections::HashMap;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{FnArg, GenericArgument, Ident, Pat, PathArguments, ReturnType, Signature, Type};

use crate::binder::path_placeholders;
use crate::config::GenerationTarget;
use crate::error::{GenerateError, Result};
use crate::metadata::ReturnsDirective;
use crate::model::{ClassModel, HeaderValue, MethodModel, QueryBinding};

const GENERATED_HEADER: &str = "// @generated by retrofit-gen. Do not edit.\n\n";

/// Everything the renderer needs besides the model.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub interface_name: &'a str,
    pub uses: &'a [String],
    pub target: &'a GenerationTarget,
}

/// Produces source text from a class model.
pub trait Renderer {
    fn render(&self, class: &ClassModel, ctx: &RenderContext<'_>) -> Result<String>;
}

/// Renders clients over the `retrofit-core` runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustRenderer;

impl Renderer for RustRenderer {
    fn render(&self, class: &ClassModel, ctx: &RenderContext<'_>) -> Result<String> {
        let tokens = self.tokens(class, ctx)?;
        let file: syn::File =
            syn::parse2(tokens).map_err(|e| GenerateError::Render(e.to_string()))?;
        Ok(format!("{GENERATED_HEADER}{}", prettyplease::unparse(&file)))
    }
}

impl RustRenderer {
    /// The client as tokens, for callers that splice it into other code.
    pub fn tokens(&self, class: &ClassModel, ctx: &RenderContext<'_>) -> Result<TokenStream> {
        let runtime: syn::Path = parse_target(&ctx.target.runtime_path, "runtime path")?;
        let interface: syn::Path = parse_target(
            ctx.target.interface_path.as_deref().unwrap_or(ctx.interface_name),
            "interface path",
        )?;
        let client: Ident = parse_target(&ctx.target.client_name, "client name")?;

        let uses = if ctx.target.copy_uses {
            ctx.uses
                .iter()
                .map(|item| parse_target::<syn::ItemUse>(item, "use item"))
                .collect::<Result<Vec<_>>>()?
        } else {
            Vec::new()
        };

        let methods = class
            .methods()
            .iter()
            .map(|method| render_method(class, method, &runtime))
            .collect::<Result<Vec<_>>>()?;

        let doc = format!(" HTTP client implementing [`{}`].", ctx.interface_name);
        Ok(quote! {
            #(#uses)*

            #[doc = #doc]
            #[derive(Debug, Clone)]
            pub struct #client<T> {
                base_url: String,
                transport: T,
            }

            impl<T> #client<T> {
                pub fn new(base_url: &str, transport: T) -> Self {
                    Self {
                        base_url: base_url.trim_end_matches('/').to_string(),
                        transport,
                    }
                }

                pub fn base_url(&self) -> &str {
                    &self.base_url
                }

                pub fn transport(&self) -> &T {
                    &self.transport
                }
            }

            impl<T: #runtime::Transport> #interface for #client<T> {
                #(#methods)*
            }
        })
    }
}

fn parse_target<T: syn::parse::Parse>(source: &str, what: &str) -> Result<T> {
    syn::parse_str(source).map_err(|e| GenerateError::Render(format!("invalid {what} `{source}`: {e}")))
}

/// A parameter of the method being rendered.
struct Param<'a> {
    ident: &'a Ident,
    ty: &'a Type,
}

fn render_method(class: &ClassModel, method: &MethodModel, runtime: &syn::Path) -> Result<TokenStream> {
    let sig: Signature = syn::parse_str(method.declaration()).map_err(|e| GenerateError::InvalidDeclaration {
        method: method.name().to_string(),
        declaration: method.declaration().to_string(),
        reason: e.to_string(),
    })?;

    let params: HashMap<String, Param<'_>> = sig
        .inputs
        .iter()
        .filter_map(|input| match input {
            FnArg::Typed(typed) => match typed.pat.as_ref() {
                Pat::Ident(pat) => Some((
                    pat.ident.unraw().to_string(),
                    Param {
                        ident: &pat.ident,
                        ty: typed.ty.as_ref(),
                    },
                )),
                _ => None,
            },
            FnArg::Receiver(_) => None,
        })
        .collect();
    let lookup = |name: &str| {
        params.get(name).ok_or_else(|| GenerateError::UnboundParameter {
            method: method.name().to_string(),
            parameter: name.to_string(),
        })
    };

    let Some(ok_type) = result_ok_type(&sig.output) else {
        return Err(GenerateError::UnsupportedSignature {
            method: method.name().to_string(),
            reason: "the return type must be a `Result`".to_string(),
        });
    };

    let request = fresh_local("request", &params);
    let response = fresh_local("response", &params);
    let mut stmts: Vec<TokenStream> = Vec::new();

    for name in path_placeholders(method.path()) {
        let ident = lookup(&name)?.ident;
        stmts.push(quote!(#request.path_param(#name, &#ident);));
    }

    for (name, value) in class.headers() {
        stmts.push(quote!(#request.header(#name, #value);));
    }
    for (name, value) in method.headers() {
        match value {
            HeaderValue::Static(value) => stmts.push(quote!(#request.header(#name, #value);)),
            HeaderValue::Param(param) => {
                let ident = lookup(param)?.ident;
                stmts.push(quote!(#request.header(#name, &#ident);));
            }
        }
    }

    for binding in method.query_bindings() {
        let param = lookup(binding.param())?;
        let ident = param.ident;
        match binding {
            QueryBinding::Named { key, .. } if is_option(param.ty) => {
                stmts.push(quote!(#request.query_opt(#key, #ident.as_ref());));
            }
            QueryBinding::Named { key, .. } => {
                stmts.push(quote!(#request.query(#key, &#ident);));
            }
            QueryBinding::Map { .. } if matches!(param.ty, Type::Reference(_)) => {
                stmts.push(quote!(#request.query_map(#ident);));
            }
            QueryBinding::Map { .. } => {
                stmts.push(quote!(#request.query_map(&#ident);));
            }
        }
    }

    for part in method.part_bindings() {
        let ident = lookup(&part.param)?.ident;
        let key = &part.key;
        stmts.push(quote!(#request.part(#key, &#ident);));
    }

    if let Some(param) = method.body_binding() {
        let ident = lookup(param)?.ident;
        stmts.push(quote!(#request.body(&#ident);));
    }
    if let Some(param) = method.json_body_binding() {
        let ident = lookup(param)?.ident;
        stmts.push(quote!(#request.json_body(&#ident)?;));
    }

    let directive = method.returns().unwrap_or_else(|| default_directive(ok_type));
    let decoder = format_ident!("{}", directive.decoder());
    let verb = format_ident!("{}", method.verb().variant_name());
    let path = method.path();
    let binding = if stmts.is_empty() {
        quote!(#request)
    } else {
        quote!(mut #request)
    };

    Ok(quote! {
        #[allow(unused_variables)]
        #sig {
            let #binding = #runtime::RequestBuilder::new(#runtime::HttpMethod::#verb, &self.base_url, #path);
            #(#stmts)*
            let #response = #runtime::Transport::execute(&self.transport, #request.build())?;
            #runtime::#decoder(#response).map_err(::core::convert::Into::into)
        }
    })
}

/// A local named `base`, suffixed with `_` until it no longer collides with
/// a parameter.
fn fresh_local(base: &str, params: &HashMap<String, Param<'_>>) -> Ident {
    let mut name = base.to_string();
    while params.contains_key(&name) {
        name.push('_');
    }
    format_ident!("{}", name)
}

/// `T` in a `Result<T, E>` return type.
fn result_ok_type(output: &ReturnType) -> Option<&Type> {
    let ReturnType::Type(_, ty) = output else {
        return None;
    };
    let Type::Path(path) = ty.as_ref() else {
        return None;
    };
    let last = path.path.segments.last()?;
    if last.ident != "Result" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}

fn default_directive(ok_type: &Type) -> ReturnsDirective {
    match ok_type {
        Type::Tuple(tuple) if tuple.elems.is_empty() => ReturnsDirective::Unit,
        _ => ReturnsDirective::Json,
    }
}

fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false,
    }
}
