//! Declarative, route-aware request building in front of an HTTP transport.
//!
//! # Overview
//! Callers describe named routes (path template, default method, static
//! query params) once, then issue requests by literal path or by `$name`
//! reference. The crate compiles each call into a plain-data `HttpRequest`
//! (method, filled URL, payload, merged params, merged options) and hands it
//! to a [`Transport`]. The core never touches the network (host-does-IO
//! pattern), so every stage is deterministic and testable.
//!
//! # Design
//! - `split` parses a call-site object once into directives (`vars`,
//!   `routes`, `addRouteMethod`), pass-through options and payload.
//! - `route` resolves URL references against an immutable `RouteTable`;
//!   `placeholder` fills `:name` tokens; `args` maps positional shortcut
//!   arguments to placeholder values.
//! - `builder` merges everything into a descriptor; `client` wraps it with
//!   per-verb shortcuts, named-route shortcuts and interceptors.
//! - Resolution errors are raised before dispatch; transport errors are
//!   returned unchanged.

pub mod args;
pub mod builder;
pub mod client;
pub mod error;
pub mod http;
pub mod placeholder;
pub mod route;
pub mod split;
pub mod transport;
pub mod types;

pub use builder::RequestBuilder;
pub use client::{Client, ClientBuilder, RouteMethod};
pub use error::{Error, RouteError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use placeholder::{fill_path, fill_path_checked, FilledPath};
pub use route::{prefix_routes, RouteDefinition, RouteTable, RouteTableBuilder, UrlRef};
pub use split::{split, Split, SplitMode};
pub use transport::{Intercepted, Transport};
pub use types::{Input, Options, Payload, VariablesMap};
