//! Error types for the request pipeline.
//!
//! # Design
//! Resolution failures (`RouteError`) are raised synchronously while a
//! request descriptor is being compiled, so nothing has been sent when one
//! surfaces. Transport failures are carried unchanged inside
//! [`Error::Transport`]; this crate never inspects or rewrites them.
//!
//! An unresolved path placeholder is deliberately absent here: it is a
//! warning, reported through `tracing` and
//! [`FilledPath::unresolved`](crate::placeholder::FilledPath).

/// Errors raised while resolving a call into a request descriptor.
#[derive(thiserror::Error, Debug)]
pub enum RouteError {
    /// A `$name` reference matched no entry in the route table.
    #[error("route \"${name}\" does not exist")]
    UnknownRoute { name: String },

    /// A resolved route descriptor has no usable path.
    #[error("invalid url/path: {reason}")]
    InvalidRoute { reason: String },

    /// The `routes` directive could not be read as a route table.
    #[error("invalid route table: {0}")]
    InvalidRouteTable(#[from] serde_json::Error),

    #[error("unknown HTTP method: {method}")]
    UnknownMethod { method: String },

    /// A named-route shortcut was invoked that the client never generated.
    #[error("no route method named \"{name}\"")]
    NoRouteMethod { name: String },
}

impl RouteError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        RouteError::InvalidRoute {
            reason: reason.into(),
        }
    }
}

/// Errors returned by [`Client`](crate::client::Client) calls.
#[derive(thiserror::Error, Debug)]
pub enum Error<E> {
    #[error(transparent)]
    Route(#[from] RouteError),

    /// The transport failed; the value is the transport's own error.
    #[error("transport error: {0}")]
    Transport(E),
}

impl<E> Error<E> {
    /// The transport error, if this is one.
    pub fn transport(&self) -> Option<&E> {
        match self {
            Error::Transport(e) => Some(e),
            Error::Route(_) => None,
        }
    }
}
