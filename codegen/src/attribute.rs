//! Parsing of retrofit attributes into `MetadataItem`s.
//!
//! Recognized attributes are identified by their (single-segment) name:
//! the verbs, `query`, `query_map`, `part`, `header`, `headers`, `body`,
//! `json_body` and `returns`. Any other attribute (`doc`, `allow`, ...) is
//! not metadata and is left alone.

use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Attribute, LitStr, Token};

use crate::metadata::{HttpVerb, MetadataItem, RequestVerb, ReturnsDirective};

const BINDING_ATTRIBUTES: [&str; 8] = [
    "query",
    "query_map",
    "part",
    "header",
    "headers",
    "body",
    "json_body",
    "returns",
];

fn attribute_name(attr: &Attribute) -> Option<String> {
    attr.path().get_ident().map(|ident| ident.to_string())
}

/// Whether the attribute is one this crate interprets.
pub fn is_metadata_attribute(attr: &Attribute) -> bool {
    attribute_name(attr).is_some_and(|name| {
        HttpVerb::from_name(&name).is_some() || BINDING_ATTRIBUTES.contains(&name.as_str())
    })
}

/// A parameter or directive name, written either as a string literal or as a
/// bare identifier.
struct Name(LitStr);

impl Parse for Name {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let lookahead = input.lookahead1();
        if lookahead.peek(LitStr) {
            Ok(Name(input.parse()?))
        } else if lookahead.peek(syn::Ident) {
            let ident: syn::Ident = input.parse()?;
            Ok(Name(LitStr::new(&ident.unraw().to_string(), ident.span())))
        } else {
            Err(lookahead.error())
        }
    }
}

/// `"key"` or `"key", var = "param"`.
struct KeyedArgs {
    key: LitStr,
    var: Option<LitStr>,
}

impl Parse for KeyedArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let key: LitStr = input.parse()?;
        let mut var = None;
        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            if !input.is_empty() {
                let ident: syn::Ident = input.parse()?;
                if ident != "var" {
                    return Err(syn::Error::new(ident.span(), "expected `var = \"name\"`"));
                }
                input.parse::<Token![=]>()?;
                var = Some(input.parse::<Name>()?.0);
                if input.peek(Token![,]) {
                    input.parse::<Token![,]>()?;
                }
            }
        }
        if !input.is_empty() {
            return Err(input.error("unexpected tokens"));
        }
        Ok(KeyedArgs { key, var })
    }
}

impl KeyedArgs {
    fn into_pair(self) -> (String, String) {
        let key = self.key.value();
        let var = self.var.map(|v| v.value()).unwrap_or_else(|| key.clone());
        (key, var)
    }
}

fn parse_header_line(lit: &LitStr) -> syn::Result<(String, String)> {
    let line = lit.value();
    let Some((name, value)) = line.split_once(':') else {
        return Err(syn::Error::new(
            lit.span(),
            "expected a header line of the form \"Name: value\"",
        ));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(syn::Error::new(lit.span(), "header name must not be empty"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Parse one attribute. Returns `Ok(None)` for attributes that are not
/// retrofit metadata.
pub fn parse_attribute(attr: &Attribute) -> syn::Result<Option<MetadataItem>> {
    let Some(name) = attribute_name(attr) else {
        return Ok(None);
    };

    if let Some(verb) = HttpVerb::from_name(&name) {
        let path: LitStr = attr.parse_args()?;
        return Ok(Some(MetadataItem::RequestVerb(RequestVerb::new(
            verb,
            path.value(),
        ))));
    }

    let item = match name.as_str() {
        "query" => {
            let (key, var) = attr.parse_args::<KeyedArgs>()?.into_pair();
            MetadataItem::Query { key, var }
        }
        "part" => {
            let (key, var) = attr.parse_args::<KeyedArgs>()?.into_pair();
            MetadataItem::Part { key, var }
        }
        "header" => {
            let (name, var) = attr.parse_args::<KeyedArgs>()?.into_pair();
            MetadataItem::Header { name, var }
        }
        "headers" => {
            let lines = attr.parse_args_with(Punctuated::<LitStr, Token![,]>::parse_terminated)?;
            let headers = lines
                .iter()
                .map(parse_header_line)
                .collect::<syn::Result<Vec<_>>>()?;
            MetadataItem::Headers(headers)
        }
        "query_map" => MetadataItem::QueryMap {
            var: attr.parse_args::<Name>()?.0.value(),
        },
        "body" => MetadataItem::Body {
            var: attr.parse_args::<Name>()?.0.value(),
        },
        "json_body" => MetadataItem::JsonBody {
            var: attr.parse_args::<Name>()?.0.value(),
        },
        "returns" => {
            let lit = attr.parse_args::<Name>()?.0;
            let directive = ReturnsDirective::from_name(&lit.value()).ok_or_else(|| {
                syn::Error::new(lit.span(), "expected one of `json`, `text`, `raw`, `unit`")
            })?;
            MetadataItem::Returns(directive)
        }
        _ => return Ok(None),
    };
    Ok(Some(item))
}
