//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate compiles `HttpRequest` descriptors without ever touching the
//! network; a [`Transport`](crate::transport::Transport) executes them. The
//! descriptor is the only value that crosses that boundary, so it carries
//! everything the transport needs and nothing the pipeline uses internally
//! (no directive keys ever reach it).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RouteError;
use crate::types::{Options, Payload};

/// HTTP method for a request.
///
/// The set is fixed: four query-like verbs that never take a payload
/// argument at the call site and three body-bearing verbs that do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    #[default]
    Get,
    Delete,
    Head,
    Options,
    Post,
    Put,
    Patch,
}

impl HttpMethod {
    pub const QUERY_LIKE: [HttpMethod; 4] = [
        HttpMethod::Get,
        HttpMethod::Delete,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    pub const BODY_BEARING: [HttpMethod; 3] =
        [HttpMethod::Post, HttpMethod::Put, HttpMethod::Patch];

    /// Lowercase wire name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
        }
    }

    /// Whether shortcuts for this verb take a payload argument.
    pub fn carries_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "delete" => Ok(HttpMethod::Delete),
            "head" => Ok(HttpMethod::Head),
            "options" => Ok(HttpMethod::Options),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "patch" => Ok(HttpMethod::Patch),
            _ => Err(RouteError::UnknownMethod {
                method: s.to_string(),
            }),
        }
    }
}

/// A fully resolved request descriptor.
///
/// Built by [`RequestBuilder`](crate::builder::RequestBuilder). `url` has
/// every resolvable placeholder substituted, `params` holds the merged query
/// parameters, and `options` carries the remaining merged configuration keys
/// (headers, timeouts, anything the transport understands). `options` is
/// flattened into the serialized form next to the fixed fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub data: Payload,
    pub params: Map<String, Value>,
    #[serde(flatten)]
    pub options: Options,
}

impl HttpRequest {
    /// Look up a pass-through option by name.
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Query parameters rendered as strings, in key order.
    ///
    /// String values are used verbatim; other JSON values use their JSON
    /// text. Null parameters are skipped.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| {
                let rendered = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), rendered)
            })
            .collect()
    }
}

/// An HTTP response described as plain data.
///
/// Transports are free to use their own response type; this one is provided
/// for hosts that want a transport-neutral value to hand back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the body as JSON.
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn method_parses_case_insensitively() {
        assert_eq!("GET".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("Patch".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        let err = "trace".parse::<HttpMethod>().unwrap_err();
        assert!(matches!(err, RouteError::UnknownMethod { ref method } if method == "trace"));
    }

    #[test]
    fn method_sets_partition_the_verbs() {
        assert!(HttpMethod::QUERY_LIKE.iter().all(|m| !m.carries_body()));
        assert!(HttpMethod::BODY_BEARING.iter().all(|m| m.carries_body()));
        assert_eq!(HttpMethod::default(), HttpMethod::Get);
    }

    #[test]
    fn request_serializes_options_flat() {
        let mut options = Map::new();
        options.insert("timeout".to_string(), json!(500));
        let req = HttpRequest {
            method: HttpMethod::Post,
            url: "/items".to_string(),
            data: Payload::Fields(json!({"title": "A"}).as_object().cloned().unwrap()),
            params: Map::new(),
            options,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "method": "post",
                "url": "/items",
                "data": {"title": "A"},
                "params": {},
                "timeout": 500
            })
        );
    }

    #[test]
    fn query_pairs_render_scalars() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: "/".to_string(),
            data: Payload::default(),
            params: json!({"page": 2, "q": "rust", "skip": null})
                .as_object()
                .cloned()
                .unwrap(),
            options: Map::new(),
        };
        assert_eq!(
            req.query_pairs(),
            vec![
                ("page".to_string(), "2".to_string()),
                ("q".to_string(), "rust".to_string()),
            ]
        );
    }

    #[test]
    fn response_success_range() {
        let ok = HttpResponse {
            status: 204,
            headers: Vec::new(),
            body: String::new(),
        };
        assert!(ok.is_success());
        let missing = HttpResponse {
            status: 404,
            ..ok
        };
        assert!(!missing.is_success());
    }
}
