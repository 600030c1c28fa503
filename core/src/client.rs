//! Route-aware HTTP client.
//!
//! # Design
//! `Client` owns a transport, an immutable route table and a dispatch table
//! of named-route shortcuts built once at construction. Every call compiles
//! a fresh [`HttpRequest`] through [`RequestBuilder`] and hands it to the
//! transport; no call mutates client state, so a `Client` can be shared
//! between threads as long as its transport can. Only interceptor
//! registration needs `&mut self`.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::args::resolve_args;
use crate::builder::RequestBuilder;
use crate::error::{Error, RouteError};
use crate::http::{HttpMethod, HttpRequest};
use crate::route::{RouteDefinition, RouteTable, RouteTableBuilder, UrlRef};
use crate::split::{split, SplitMode};
use crate::transport::{Intercepted, Transport};
use crate::types::{Input, Options};

/// How a named-route shortcut takes its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMethod {
    /// Query-like route: positional or keyed arguments fill `template`.
    Query { method: HttpMethod, template: String },
    /// Body-bearing route: arguments are `(payload, config)`.
    Body { method: HttpMethod },
}

impl RouteMethod {
    fn for_route(route: &RouteDefinition) -> Self {
        if route.method.carries_body() {
            RouteMethod::Body {
                method: route.method,
            }
        } else {
            RouteMethod::Query {
                method: route.method,
                template: route.path.clone(),
            }
        }
    }
}

/// HTTP client bound to a route table.
#[derive(Debug)]
pub struct Client<T: Transport> {
    transport: Intercepted<T>,
    routes: RouteTable,
    route_methods: HashMap<String, RouteMethod>,
}

impl<T: Transport> Client<T> {
    /// Create a client from a JSON configuration object.
    ///
    /// `routes` and `addRouteMethod` (bare or `$`-marked) are read as
    /// directives; every other key is passed to [`Transport::configure`].
    pub fn create(config: Value) -> Result<Self, Error<T::Error>> {
        let mut split = split(config.into(), SplitMode::Config);
        let route_methods = split.directives.add_route_method();
        let routes = match split.directives.routes.take() {
            None | Some(Value::Null) => RouteTable::default(),
            Some(routes) => RouteTable::from_value(routes)?,
        };
        let transport = T::configure(split.options).map_err(Error::Transport)?;
        Ok(Self::from_parts(transport, routes, route_methods))
    }

    /// Assemble a client from an existing transport.
    pub fn from_parts(transport: T, routes: RouteTable, route_methods: bool) -> Self {
        let mut methods = HashMap::new();
        if route_methods {
            for route in routes.iter() {
                if let Some(name) = &route.name {
                    methods
                        .entry(name.clone())
                        .or_insert_with(|| RouteMethod::for_route(route));
                }
            }
        }
        Self {
            transport: Intercepted::new(transport),
            routes,
            route_methods: methods,
        }
    }

    /// The transport this client dispatches to.
    pub fn transport(&self) -> &T {
        self.transport.inner()
    }

    /// The transport together with its interceptor chain.
    pub fn interceptors_mut(&mut self) -> &mut Intercepted<T> {
        &mut self.transport
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Compile a request without dispatching it.
    pub fn build(
        &self,
        method: HttpMethod,
        url: impl Into<UrlRef>,
        payload: impl Into<Input>,
        config: impl Into<Input>,
    ) -> Result<HttpRequest, RouteError> {
        RequestBuilder::new(&self.routes).build(method, &url.into(), payload.into(), config.into())
    }

    /// Compile a request and dispatch it.
    pub fn send(
        &self,
        method: HttpMethod,
        url: impl Into<UrlRef>,
        payload: impl Into<Input>,
        config: impl Into<Input>,
    ) -> Result<T::Response, Error<T::Error>> {
        let request = self.build(method, url, payload, config)?;
        debug!(method = %request.method, url = %request.url, "dispatching request");
        self.transport.execute(request).map_err(Error::Transport)
    }

    /// Issue a request described by one object: `method` (default `get`),
    /// `url` (string reference or route descriptor), `data`; the remaining
    /// keys are call-site configuration.
    ///
    /// `data` is sent verbatim. It is never split and never fills path
    /// placeholders; use `vars` for those.
    pub fn request(&self, config: Value) -> Result<T::Response, Error<T::Error>> {
        let mut config = match config {
            Value::Object(config) => config,
            Value::Null => Map::new(),
            other => {
                return Err(RouteError::invalid(format!(
                    "request config must be an object, got {other}"
                ))
                .into())
            }
        };
        let method = match config.remove("method") {
            None | Some(Value::Null) => HttpMethod::Get,
            Some(Value::String(method)) => method.parse()?,
            Some(other) => {
                return Err(RouteError::UnknownMethod {
                    method: other.to_string(),
                }
                .into())
            }
        };
        let url = match config.remove("url") {
            Some(url) => UrlRef::from_value(url)?,
            None => return Err(RouteError::invalid("request config has no url").into()),
        };
        self.send(method, url, Input::default(), config)
    }

    pub fn get(&self, url: impl Into<UrlRef>, config: impl Into<Input>) -> Result<T::Response, Error<T::Error>> {
        self.send(HttpMethod::Get, url, Input::default(), config)
    }

    pub fn delete(&self, url: impl Into<UrlRef>, config: impl Into<Input>) -> Result<T::Response, Error<T::Error>> {
        self.send(HttpMethod::Delete, url, Input::default(), config)
    }

    pub fn head(&self, url: impl Into<UrlRef>, config: impl Into<Input>) -> Result<T::Response, Error<T::Error>> {
        self.send(HttpMethod::Head, url, Input::default(), config)
    }

    pub fn options(&self, url: impl Into<UrlRef>, config: impl Into<Input>) -> Result<T::Response, Error<T::Error>> {
        self.send(HttpMethod::Options, url, Input::default(), config)
    }

    pub fn post(
        &self,
        url: impl Into<UrlRef>,
        payload: impl Into<Input>,
        config: impl Into<Input>,
    ) -> Result<T::Response, Error<T::Error>> {
        self.send(HttpMethod::Post, url, payload, config)
    }

    pub fn put(
        &self,
        url: impl Into<UrlRef>,
        payload: impl Into<Input>,
        config: impl Into<Input>,
    ) -> Result<T::Response, Error<T::Error>> {
        self.send(HttpMethod::Put, url, payload, config)
    }

    pub fn patch(
        &self,
        url: impl Into<UrlRef>,
        payload: impl Into<Input>,
        config: impl Into<Input>,
    ) -> Result<T::Response, Error<T::Error>> {
        self.send(HttpMethod::Patch, url, payload, config)
    }

    /// The shortcut generated for route `name`, if route methods are enabled.
    pub fn route_method(&self, name: &str) -> Option<&RouteMethod> {
        self.route_methods.get(name)
    }

    pub fn has_route_method(&self, name: &str) -> bool {
        self.route_methods.contains_key(name)
    }

    /// Invoke the shortcut for route `name` with the route's own method.
    ///
    /// Query-like routes take positional placeholder values or a
    /// configuration object (see [`resolve_args`]). Body-bearing routes take
    /// `[payload, config]`.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<T::Response, Error<T::Error>> {
        let shortcut = self
            .route_methods
            .get(name)
            .ok_or_else(|| RouteError::NoRouteMethod {
                name: name.to_string(),
            })?;
        let url = UrlRef::Named(name.to_string());
        match shortcut {
            RouteMethod::Query { method, template } => {
                let config = resolve_args(template, args);
                self.send(*method, url, Input::default(), config)
            }
            RouteMethod::Body { method } => {
                let payload = args.first().cloned().unwrap_or(Value::Null);
                let config = args.get(1).cloned().unwrap_or(Value::Null);
                self.send(*method, url, payload, config)
            }
        }
    }

    /// Register a request interceptor.
    pub fn on_request<F>(&mut self, interceptor: F)
    where
        T: 'static,
        F: Fn(HttpRequest) -> Result<HttpRequest, T::Error> + Send + Sync + 'static,
    {
        self.transport
            .use_request(Some(interceptor), None::<fn(T::Error) -> Result<HttpRequest, T::Error>>);
    }

    /// Register a request interceptor together with a handler for failures
    /// raised by interceptors that run before it.
    pub fn on_request_with<F, R>(&mut self, interceptor: F, on_error: R)
    where
        T: 'static,
        F: Fn(HttpRequest) -> Result<HttpRequest, T::Error> + Send + Sync + 'static,
        R: Fn(T::Error) -> Result<HttpRequest, T::Error> + Send + Sync + 'static,
    {
        self.transport.use_request(Some(interceptor), Some(on_error));
    }

    /// Register a handler for failures raised by earlier request interceptors.
    pub fn on_request_error<R>(&mut self, handler: R)
    where
        T: 'static,
        R: Fn(T::Error) -> Result<HttpRequest, T::Error> + Send + Sync + 'static,
    {
        self.transport
            .use_request(None::<fn(HttpRequest) -> Result<HttpRequest, T::Error>>, Some(handler));
    }

    /// Register a response interceptor.
    pub fn on_response<F>(&mut self, interceptor: F)
    where
        T: 'static,
        F: Fn(T::Response) -> Result<T::Response, T::Error> + Send + Sync + 'static,
    {
        self.transport.use_response(
            Some(interceptor),
            None::<fn(T::Error) -> Result<T::Response, T::Error>>,
        );
    }

    /// Register a response interceptor together with a failure handler. The
    /// handler may recover by returning a response.
    pub fn on_response_with<F, R>(&mut self, interceptor: F, on_error: R)
    where
        T: 'static,
        F: Fn(T::Response) -> Result<T::Response, T::Error> + Send + Sync + 'static,
        R: Fn(T::Error) -> Result<T::Response, T::Error> + Send + Sync + 'static,
    {
        self.transport.use_response(Some(interceptor), Some(on_error));
    }

    /// Register a handler notified of transport failures. The failure is
    /// still returned to the caller.
    pub fn on_response_error<H>(&mut self, handler: H)
    where
        T: 'static,
        H: Fn(&T::Error) + Send + Sync + 'static,
    {
        self.transport.use_response(
            None::<fn(T::Response) -> Result<T::Response, T::Error>>,
            Some(move |err: T::Error| {
                handler(&err);
                Err(err)
            }),
        );
    }
}

/// Typed construction of a [`Client`].
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    options: Options,
    routes: RouteTableBuilder,
    route_methods: bool,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a transport option.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn routes(mut self, routes: impl IntoIterator<Item = RouteDefinition>) -> Self {
        self.routes = self.routes.routes(routes);
        self
    }

    /// Append `routes` with `base` prepended to every path.
    pub fn mount(mut self, base: &str, routes: impl IntoIterator<Item = RouteDefinition>) -> Self {
        self.routes = self.routes.mount(base, routes);
        self
    }

    pub fn route_table(self, table: RouteTable) -> Self {
        self.routes(table)
    }

    /// Generate a shortcut per named route.
    pub fn route_methods(mut self, enabled: bool) -> Self {
        self.route_methods = enabled;
        self
    }

    pub fn build<T: Transport>(self) -> Result<Client<T>, Error<T::Error>> {
        let transport = T::configure(self.options).map_err(Error::Transport)?;
        Ok(Client::from_parts(
            transport,
            self.routes.build(),
            self.route_methods,
        ))
    }
}
