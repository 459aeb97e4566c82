use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use retrofit_codegen::introspect::strip_metadata_attributes;
use retrofit_codegen::{Generator, GeneratorConfig, InterfaceDescriptor, RenderContext, RustRenderer};
use syn::parse::{Parse, ParseStream};
use syn::{parse_macro_input, Ident, ItemTrait, LitStr, Token};

/// Generates an HTTP client for an annotated trait.
///
/// The trait is emitted without its request attributes, followed by a
/// `<Trait>Client<T>` struct implementing it over any
/// `retrofit_core::Transport`.
///
/// # Example
///
/// ```ignore
/// #[rest_client]
/// #[headers("X-Client: retrofit")]
/// pub trait UserApi {
///     #[get("/users/{id}")]
///     #[headers("Accept: application/json")]
///     fn get_user(&self, id: &str) -> Result<User, ApiError>;
///
///     #[post("/users")]
///     #[json_body(user)]
///     fn create_user(&self, user: &NewUser) -> Result<User, ApiError>;
/// }
///
/// let client = UserApiClient::new("http://localhost:3000", transport);
/// let user = client.get_user("42")?;
/// ```
///
/// # Arguments
///
/// - `client = "Name"`: name of the generated struct.
/// - `runtime = "path"`: where the runtime crate is found
///   (default `::retrofit_core`).
#[proc_macro_attribute]
pub fn rest_client(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ClientArgs);
    let mut item = parse_macro_input!(item as ItemTrait);
    let generated = expand(&args, &item);
    strip_metadata_attributes(&mut item);
    match generated {
        Ok(client) => quote!(#item #client).into(),
        Err(err) => {
            let err = err.to_compile_error();
            quote!(#item #err).into()
        }
    }
}

#[derive(Default)]
struct ClientArgs {
    client: Option<LitStr>,
    runtime: Option<LitStr>,
}

impl Parse for ClientArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = ClientArgs::default();
        while !input.is_empty() {
            let key: Ident = input.parse()?;
            input.parse::<Token![=]>()?;
            let value: LitStr = input.parse()?;
            match key.to_string().as_str() {
                "client" => args.client = Some(value),
                "runtime" => args.runtime = Some(value),
                _ => {
                    return Err(syn::Error::new(
                        key.span(),
                        "unknown argument, expected `client` or `runtime`",
                    ))
                }
            }
            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }
        Ok(args)
    }
}

fn expand(args: &ClientArgs, item: &ItemTrait) -> syn::Result<TokenStream2> {
    let span = item.ident.span();
    let descriptor = InterfaceDescriptor::from_trait(item).map_err(|e| e.into_syn_error(span))?;

    let mut target = GeneratorConfig::default()
        .target_for(&descriptor.name)
        .with_interface_path(item.ident.to_string())
        .with_copy_uses(false);
    if let Some(client) = &args.client {
        target.client_name = client.value();
    }
    if let Some(runtime) = &args.runtime {
        target = target.with_runtime_path(runtime.value());
    }

    let class = Generator::default()
        .build(&descriptor)
        .map_err(|e| e.into_syn_error(span))?;
    let ctx = RenderContext {
        interface_name: &descriptor.name,
        uses: &[],
        target: &target,
    };
    RustRenderer
        .tokens(&class, &ctx)
        .map_err(|e| e.into_syn_error(span))
}
