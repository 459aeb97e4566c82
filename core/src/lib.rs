//! Runtime support for clients generated by `retrofit-codegen`.
//!
//! # Overview
//! Generated clients build `HttpRequest` values and decode `HttpResponse`
//! values without touching the network (host-does-IO pattern). The injected
//! `Transport` executes the actual HTTP round-trip, keeping the generated code
//! deterministic and testable.
//!
//! # Design
//! - A generated method creates a `RequestBuilder`, replays the bindings that
//!   were validated at generation time, hands the request to the transport and
//!   finishes with one of the `decode_*` functions.
//! - Types use owned `String` / `Vec` fields so any transport can consume
//!   them.

pub mod builder;
pub mod decode;
pub mod error;
pub mod http;
pub mod transport;

pub use builder::RequestBuilder;
pub use decode::{decode_json, decode_raw, decode_text, decode_unit};
pub use error::ApiError;
pub use http::{Body, HttpMethod, HttpRequest, HttpResponse};
pub use transport::Transport;
