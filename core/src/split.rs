//! Partitioning of call-site objects into directives, options and payload.
//!
//! A key is *marked* when it starts with [`MARKER`]. Marked keys (and, in
//! [`SplitMode::Config`], every key) are treated as configuration: the
//! marker is stripped and the remaining name is either one of the fixed
//! directive names or a plain option. Everything else is payload.
//!
//! The result is parsed once into a [`Split`] record, so later stages never
//! look at markers again.

use serde_json::{Map, Value};

use crate::types::{Input, Options, Payload, VariablesMap};

/// Leading character that marks a key as configuration inside a payload.
pub const MARKER: char = '$';

/// How unmarked keys are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Mixed payload/config argument: only marked keys are configuration.
    Payload,
    /// Configuration-only object: every key is configuration.
    Config,
}

/// The recognized directive names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Vars,
    Routes,
    AddRouteMethod,
}

impl Directive {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "vars" => Some(Directive::Vars),
            "routes" => Some(Directive::Routes),
            "addRouteMethod" => Some(Directive::AddRouteMethod),
            _ => None,
        }
    }
}

/// Directive values found in one object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directives {
    pub vars: Option<Value>,
    pub routes: Option<Value>,
    pub add_route_method: Option<Value>,
}

impl Directives {
    fn set(&mut self, directive: Directive, value: Value) {
        let slot = match directive {
            Directive::Vars => &mut self.vars,
            Directive::Routes => &mut self.routes,
            Directive::AddRouteMethod => &mut self.add_route_method,
        };
        *slot = Some(value);
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_none() && self.routes.is_none() && self.add_route_method.is_none()
    }

    /// `vars` as a variables map. Anything other than an object yields an
    /// empty map.
    pub fn vars_map(&self) -> VariablesMap {
        match &self.vars {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        }
    }

    /// Whether named-route shortcuts were requested. Any truthy value turns
    /// them on: `true`, a non-zero number, a non-empty string, an array or an
    /// object.
    pub fn add_route_method(&self) -> bool {
        match &self.add_route_method {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => *flag,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        }
    }
}

/// One call-site object, split.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Split {
    pub directives: Directives,
    pub options: Options,
    pub payload: Payload,
}

/// Split `input` according to `mode`.
///
/// Binary input and non-object JSON short-circuit into the payload with no
/// directives or options. Null is treated as an empty object.
pub fn split(input: Input, mode: SplitMode) -> Split {
    let map = match input {
        Input::Binary {
            content_type,
            bytes,
        } => {
            return Split {
                payload: Payload::Binary {
                    content_type,
                    bytes,
                },
                ..Split::default()
            };
        }
        Input::Json(Value::Object(map)) => map,
        Input::Json(Value::Null) => Map::new(),
        Input::Json(other) => {
            return Split {
                payload: Payload::Json(other),
                ..Split::default()
            };
        }
    };

    let mut directives = Directives::default();
    let mut options = Options::new();
    let mut data = Map::new();

    for (key, value) in map {
        let config_name = if let Some(name) = key.strip_prefix(MARKER) {
            name.to_string()
        } else if mode == SplitMode::Config {
            key
        } else {
            data.insert(key, value);
            continue;
        };
        match Directive::from_name(&config_name) {
            Some(directive) => directives.set(directive, value),
            None => {
                options.insert(config_name, value);
            }
        }
    }

    Split {
        directives,
        options,
        payload: Payload::Fields(data),
    }
}
