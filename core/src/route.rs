//! Route definitions, route tables and URL reference resolution.
//!
//! # Design
//! A route table is an ordered list; lookup by name is first-match. Tables
//! are composed with [`RouteTableBuilder`] before a client is created and
//! are immutable afterwards, so a client can be shared across threads
//! without locking.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::RouteError;
use crate::http::HttpMethod;
use crate::split::MARKER;

/// A reusable path template with a default verb and static query params.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub path: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
    /// Also consult the payload's fields for placeholder values.
    #[serde(default)]
    pub fill_path_with_data: bool,
}

impl RouteDefinition {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            name: None,
            path: path.into(),
            method: HttpMethod::Get,
            params: Map::new(),
            fill_path_with_data: false,
        }
    }

    pub fn named(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(path)
        }
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_fill_path_with_data(mut self, enabled: bool) -> Self {
        self.fill_path_with_data = enabled;
        self
    }

    /// Read a route from a JSON descriptor object.
    ///
    /// `path` is checked first so a missing or non-string path is always
    /// reported as such rather than as a generic decoding failure.
    pub fn from_descriptor(descriptor: &Map<String, Value>) -> Result<Self, RouteError> {
        match descriptor.get("path") {
            Some(Value::String(_)) => {}
            Some(other) => {
                return Err(RouteError::invalid(format!(
                    "path must be a string, got {other}"
                )))
            }
            None => return Err(RouteError::invalid("route descriptor has no path")),
        }
        serde_json::from_value(Value::Object(descriptor.clone()))
            .map_err(|e| RouteError::invalid(e.to_string()))
    }
}

/// Ordered sequence of routes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTable {
    routes: Vec<RouteDefinition>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteDefinition>) -> Self {
        Self { routes }
    }

    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Read a table from the JSON value of a `routes` directive.
    pub fn from_value(value: Value) -> Result<Self, RouteError> {
        let routes: Vec<RouteDefinition> = serde_json::from_value(value)?;
        Ok(Self { routes })
    }

    /// First route whose name is `name`.
    pub fn find(&self, name: &str) -> Option<&RouteDefinition> {
        self.routes.iter().find(|r| r.name.as_deref() == Some(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteDefinition> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl IntoIterator for RouteTable {
    type Item = RouteDefinition;
    type IntoIter = std::vec::IntoIter<RouteDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.into_iter()
    }
}

impl From<Vec<RouteDefinition>> for RouteTable {
    fn from(routes: Vec<RouteDefinition>) -> Self {
        Self::new(routes)
    }
}

/// Accumulates routes by successive appends, then produces a [`RouteTable`].
#[derive(Debug, Clone, Default)]
pub struct RouteTableBuilder {
    routes: Vec<RouteDefinition>,
}

impl RouteTableBuilder {
    pub fn routes(mut self, routes: impl IntoIterator<Item = RouteDefinition>) -> Self {
        self.routes.extend(routes);
        self
    }

    pub fn route(mut self, route: RouteDefinition) -> Self {
        self.routes.push(route);
        self
    }

    /// Append `routes` with `base` prepended to every path.
    pub fn mount(self, base: &str, routes: impl IntoIterator<Item = RouteDefinition>) -> Self {
        self.routes(prefix_routes(base, routes))
    }

    pub fn build(self) -> RouteTable {
        for (i, route) in self.routes.iter().enumerate() {
            let Some(name) = route.name.as_deref() else {
                continue;
            };
            let shadowed = self.routes[..i]
                .iter()
                .any(|earlier| earlier.name.as_deref() == Some(name));
            if shadowed {
                warn!(
                    route = %name,
                    path = %route.path,
                    "duplicate route name, the earlier definition wins"
                );
            }
        }
        RouteTable {
            routes: self.routes,
        }
    }
}

/// Prepend `base` to the path of every route.
///
/// Plain concatenation: `prefix_routes("/api", ..)` on `/users` gives
/// `/api/users`, and the conventional base `/` on `users` gives `/users`.
pub fn prefix_routes(
    base: &str,
    routes: impl IntoIterator<Item = RouteDefinition>,
) -> Vec<RouteDefinition> {
    routes
        .into_iter()
        .map(|mut route| {
            route.path = format!("{base}{}", route.path);
            route
        })
        .collect()
}

/// What a caller passes as the URL of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum UrlRef {
    /// A literal path template.
    Path(String),
    /// A route name (written `$name` at the call site).
    Named(String),
    /// An already resolved route.
    Route(RouteDefinition),
    /// A raw JSON route descriptor, validated on resolution.
    Descriptor(Map<String, Value>),
}

impl UrlRef {
    pub fn parse(url: &str) -> Self {
        match url.strip_prefix(MARKER) {
            Some(name) => UrlRef::Named(name.to_string()),
            None => UrlRef::Path(url.to_string()),
        }
    }

    /// Interpret a JSON `url` value: a string reference or a descriptor object.
    pub fn from_value(value: Value) -> Result<Self, RouteError> {
        match value {
            Value::String(s) => Ok(UrlRef::parse(&s)),
            Value::Object(map) => Ok(UrlRef::Descriptor(map)),
            other => Err(RouteError::invalid(format!(
                "url must be a string or a route descriptor, got {other}"
            ))),
        }
    }
}

impl From<&str> for UrlRef {
    fn from(url: &str) -> Self {
        UrlRef::parse(url)
    }
}

impl From<String> for UrlRef {
    fn from(url: String) -> Self {
        UrlRef::parse(&url)
    }
}

impl From<&String> for UrlRef {
    fn from(url: &String) -> Self {
        UrlRef::parse(url)
    }
}

impl From<RouteDefinition> for UrlRef {
    fn from(route: RouteDefinition) -> Self {
        UrlRef::Route(route)
    }
}

impl From<Map<String, Value>> for UrlRef {
    fn from(descriptor: Map<String, Value>) -> Self {
        UrlRef::Descriptor(descriptor)
    }
}

/// Resolve `url` against `routes`.
///
/// Named references borrow from the table; literal paths and descriptors
/// produce an owned route with no name, no static params and data filling
/// disabled unless the descriptor says otherwise.
pub fn resolve<'a>(url: &'a UrlRef, routes: &'a RouteTable) -> Result<Cow<'a, RouteDefinition>, RouteError> {
    match url {
        UrlRef::Route(route) => Ok(Cow::Borrowed(route)),
        UrlRef::Descriptor(descriptor) => RouteDefinition::from_descriptor(descriptor).map(Cow::Owned),
        UrlRef::Named(name) => routes
            .find(name)
            .map(Cow::Borrowed)
            .ok_or_else(|| RouteError::UnknownRoute { name: name.clone() }),
        UrlRef::Path(path) => Ok(Cow::Owned(RouteDefinition::new(path.clone()))),
    }
}
