//! Compiles one call into an [`HttpRequest`] descriptor.
//!
//! # Design
//! `RequestBuilder` borrows the client's route table and carries no other
//! state, so building is a pure function of its arguments. Precedence,
//! lowest first:
//!
//! - options: marked keys of the payload argument, then the call-site config
//! - variables: payload `$vars`, call-site `vars`, then the payload fields
//!   when the route has `fill_path_with_data`
//! - query params: the merged options' `params`, then the route's own params
//!
//! Merged options are spread over the descriptor last: `method`, `url` and
//! `data` found there replace the resolved fields. Only `params` is kept
//! out of the spread.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::RouteError;
use crate::http::{HttpMethod, HttpRequest};
use crate::placeholder::fill_path;
use crate::route::{resolve, RouteTable, UrlRef};
use crate::split::{split, SplitMode};
use crate::types::{Input, Payload, VariablesMap};

/// Stateless request compiler bound to a route table.
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
    routes: &'a RouteTable,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(routes: &'a RouteTable) -> Self {
        Self { routes }
    }

    pub fn build(
        &self,
        method: HttpMethod,
        url: &UrlRef,
        payload: Input,
        config: Input,
    ) -> Result<HttpRequest, RouteError> {
        let payload_split = split(payload, SplitMode::Payload);
        // Payload keys of a config-only object are dropped.
        let config_split = split(config, SplitMode::Config);

        let mut options = payload_split.options;
        options.extend(config_split.options);

        let route = resolve(url, self.routes)?;

        let mut vars: VariablesMap = payload_split.directives.vars_map();
        vars.extend(config_split.directives.vars_map());
        if route.fill_path_with_data {
            if let Some(fields) = payload_split.payload.fields() {
                vars.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }

        let mut url = fill_path(&route.path, &vars);
        let mut method = method;
        let mut data = payload_split.payload;

        let mut params = match options.remove("params") {
            Some(Value::Object(params)) => params,
            _ => Map::new(),
        };
        params.extend(route.params.iter().map(|(k, v)| (k.clone(), v.clone())));

        match options.remove("method") {
            None | Some(Value::Null) => {}
            Some(Value::String(name)) => method = name.parse()?,
            Some(other) => {
                return Err(RouteError::UnknownMethod {
                    method: other.to_string(),
                })
            }
        }
        match options.remove("url") {
            None | Some(Value::Null) => {}
            Some(Value::String(replacement)) => url = replacement,
            Some(other) => {
                return Err(RouteError::invalid(format!(
                    "url option must be a string, got {other}"
                )))
            }
        }
        if let Some(replacement) = options.remove("data").filter(|v| !v.is_null()) {
            debug!("request data replaced by the data option");
            data = Payload::from(replacement);
        }

        debug!(
            method = %method,
            url = %url,
            template = %route.path,
            params = params.len(),
            "built request"
        );

        Ok(HttpRequest {
            method,
            url,
            data,
            params,
            options,
        })
    }
}
