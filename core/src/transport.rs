//! The transport contract and its interceptor chain.
//!
//! # Design
//! The core never performs I/O. A [`Transport`] receives a finished
//! [`HttpRequest`] and returns whatever outcome it produces; errors flow
//! back untouched. Hosts pick the HTTP engine (blocking agent, async client
//! driven by its own runtime, a recorder in tests) by implementing the trait.
//!
//! [`Intercepted`] wraps any transport with request and response hooks. It
//! is itself a `Transport`, so hooks are invisible to the request pipeline.
//! Request hooks run most recently registered first; response hooks run in
//! registration order.

use crate::http::HttpRequest;
use crate::types::Options;

/// Executes request descriptors.
pub trait Transport: Sized {
    type Response;
    type Error;

    /// Build a transport from the client's pass-through options.
    fn configure(options: Options) -> Result<Self, Self::Error>;

    fn execute(&self, request: HttpRequest) -> Result<Self::Response, Self::Error>;
}

type Fulfilled<T, E> = Box<dyn Fn(T) -> Result<T, E> + Send + Sync>;
type Rejected<T, E> = Box<dyn Fn(E) -> Result<T, E> + Send + Sync>;

/// One registered interceptor: an optional success hook and an optional
/// failure hook. Missing hooks pass the outcome through.
struct Hook<T, E> {
    fulfilled: Option<Fulfilled<T, E>>,
    rejected: Option<Rejected<T, E>>,
}

impl<T, E> Hook<T, E> {
    fn apply(&self, outcome: Result<T, E>) -> Result<T, E> {
        match outcome {
            Ok(value) => match &self.fulfilled {
                Some(f) => f(value),
                None => Ok(value),
            },
            Err(err) => match &self.rejected {
                Some(r) => r(err),
                None => Err(err),
            },
        }
    }
}

/// A transport with request and response interceptors.
pub struct Intercepted<T: Transport> {
    inner: T,
    request: Vec<Hook<HttpRequest, T::Error>>,
    response: Vec<Hook<T::Response, T::Error>>,
}

impl<T: Transport> Intercepted<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            request: Vec::new(),
            response: Vec::new(),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn use_request<F, R>(&mut self, fulfilled: Option<F>, rejected: Option<R>)
    where
        F: Fn(HttpRequest) -> Result<HttpRequest, T::Error> + Send + Sync + 'static,
        R: Fn(T::Error) -> Result<HttpRequest, T::Error> + Send + Sync + 'static,
    {
        self.request.push(Hook {
            fulfilled: fulfilled.map(|f| Box::new(f) as Fulfilled<_, _>),
            rejected: rejected.map(|r| Box::new(r) as Rejected<_, _>),
        });
    }

    pub fn use_response<F, R>(&mut self, fulfilled: Option<F>, rejected: Option<R>)
    where
        F: Fn(T::Response) -> Result<T::Response, T::Error> + Send + Sync + 'static,
        R: Fn(T::Error) -> Result<T::Response, T::Error> + Send + Sync + 'static,
    {
        self.response.push(Hook {
            fulfilled: fulfilled.map(|f| Box::new(f) as Fulfilled<_, _>),
            rejected: rejected.map(|r| Box::new(r) as Rejected<_, _>),
        });
    }
}

impl<T: Transport> Transport for Intercepted<T> {
    type Response = T::Response;
    type Error = T::Error;

    fn configure(options: Options) -> Result<Self, Self::Error> {
        T::configure(options).map(Intercepted::new)
    }

    fn execute(&self, request: HttpRequest) -> Result<Self::Response, Self::Error> {
        let request = self
            .request
            .iter()
            .rev()
            .fold(Ok(request), |outcome, hook| hook.apply(outcome));
        let outcome = match request {
            Ok(request) => self.inner.execute(request),
            Err(err) => Err(err),
        };
        self.response
            .iter()
            .fold(outcome, |outcome, hook| hook.apply(outcome))
    }
}

impl<T: Transport + std::fmt::Debug> std::fmt::Debug for Intercepted<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Intercepted")
            .field("inner", &self.inner)
            .field("request_hooks", &self.request.len())
            .field("response_hooks", &self.response.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::types::Payload;
    use serde_json::Map;
    use std::sync::{Arc, Mutex};

    /// Echoes the request URL, failing for URLs under `/fail`.
    #[derive(Debug)]
    struct UrlEcho;

    impl Transport for UrlEcho {
        type Response = String;
        type Error = String;

        fn configure(_options: Options) -> Result<Self, Self::Error> {
            Ok(UrlEcho)
        }

        fn execute(&self, request: HttpRequest) -> Result<String, String> {
            if request.url.starts_with("/fail") {
                Err(format!("refused {}", request.url))
            } else {
                Ok(request.url)
            }
        }
    }

    fn request(url: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            data: Payload::default(),
            params: Map::new(),
            options: Map::new(),
        }
    }

    type NoHook<T> = fn(String) -> Result<T, String>;

    #[test]
    fn no_hooks_is_a_plain_pass_through() {
        let transport = Intercepted::<UrlEcho>::configure(Map::new()).unwrap();
        assert_eq!(transport.execute(request("/a")).unwrap(), "/a");
        assert_eq!(transport.execute(request("/fail")).unwrap_err(), "refused /fail");
    }

    #[test]
    fn request_hooks_run_last_registered_first() {
        let mut transport = Intercepted::new(UrlEcho);
        transport.use_request(
            Some(|mut req: HttpRequest| {
                req.url.push_str("/first");
                Ok(req)
            }),
            None::<NoHook<HttpRequest>>,
        );
        transport.use_request(
            Some(|mut req: HttpRequest| {
                req.url.push_str("/second");
                Ok(req)
            }),
            None::<NoHook<HttpRequest>>,
        );
        assert_eq!(transport.execute(request("")).unwrap(), "/second/first");
    }

    #[test]
    fn response_hooks_run_in_registration_order() {
        let mut transport = Intercepted::new(UrlEcho);
        transport.use_response(Some(|res: String| Ok(res + "-1")), None::<NoHook<String>>);
        transport.use_response(Some(|res: String| Ok(res + "-2")), None::<NoHook<String>>);
        assert_eq!(transport.execute(request("/r")).unwrap(), "/r-1-2");
    }

    #[test]
    fn rejected_request_hook_can_recover() {
        let mut transport = Intercepted::new(UrlEcho);
        transport.use_request(
            None::<fn(HttpRequest) -> Result<HttpRequest, String>>,
            Some(|_err: String| Ok(request("/recovered"))),
        );
        transport.use_request(
            Some(|_req: HttpRequest| Err("blocked".to_string())),
            None::<NoHook<HttpRequest>>,
        );
        assert_eq!(transport.execute(request("/x")).unwrap(), "/recovered");
    }

    #[test]
    fn failure_notifications_keep_the_error() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut transport = Intercepted::new(UrlEcho);
        transport.use_response(
            None::<fn(String) -> Result<String, String>>,
            Some(move |err: String| {
                sink.lock().unwrap().push(err.clone());
                Err(err)
            }),
        );
        let err = transport.execute(request("/fail/1")).unwrap_err();
        assert_eq!(err, "refused /fail/1");
        assert_eq!(*seen.lock().unwrap(), vec!["refused /fail/1".to_string()]);
    }
}
