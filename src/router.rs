//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. A path that exists under
//! some other method answers 405 with an `allow` header instead of 404.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::{Exchange, Middleware};
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// [`Router::on`] and [`Router::layer`] return `self` so registrations chain.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    middleware: Vec<Box<dyn Middleware>>,
}

/// Outcome of matching a method + path against the routing table.
pub(crate) enum Route {
    Found(BoxedHandler, HashMap<String, String>),
    MethodNotAllowed(Vec<Method>),
    NotFound,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), middleware: Vec::new() }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax and are read with `req.param("name")`.
    /// Static segments win over parameters, so `/api/posts/search` and
    /// `/api/posts/{id}` can live side by side.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are fixed at startup, so this is a
    /// programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{method} {path}`: {e}"));
        self
    }

    /// Append a middleware. See [`Middleware`] for ordering.
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        self.middleware.push(Box::new(middleware));
        self
    }

    /// Finds the handler for `method` + `path`.
    ///
    /// `HEAD` falls back to the `GET` tree when it has no route of its own;
    /// hyper drops the body on the way out.
    pub(crate) fn lookup(&self, method: Method, path: &str) -> Route {
        let found = self.find(method, path).or_else(|| match method {
            Method::Head => self.find(Method::Get, path),
            _ => None,
        });
        if let Some(route) = found {
            return route;
        }

        let mut allowed: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(m, _)| *m)
            .collect();
        if allowed.is_empty() {
            return Route::NotFound;
        }
        if allowed.contains(&Method::Get) && !allowed.contains(&Method::Head) {
            allowed.push(Method::Head);
        }
        allowed.sort_by_key(|m| m.as_str());
        Route::MethodNotAllowed(allowed)
    }

    fn find(&self, method: Method, path: &str) -> Option<Route> {
        let matched = self.routes.get(&method)?.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some(Route::Found(handler, params))
    }

    /// Runs one request through middleware and routing.
    ///
    /// This is what the server calls for every request; it is public so the
    /// whole application can be exercised in-process.
    pub async fn handle(&self, req: Request) -> Response {
        let started = Instant::now();
        let method = req.method();
        let path = req.path().to_owned();

        let response = match self.middleware.iter().find_map(|m| m.before(&req)) {
            Some(res) => res,
            None => match self.lookup(method, &path) {
                Route::Found(handler, params) => handler.call(req.with_params(params)).await,
                Route::MethodNotAllowed(allowed) => method_not_allowed(method, &allowed),
                Route::NotFound => not_found(),
            },
        };

        self.finish(method.as_str(), &path, started, response)
    }

    /// Runs the `after` hooks over a response, in reverse registration order.
    ///
    /// [`handle`](Router::handle) ends here; so does every request the server
    /// rejects before a [`Request`] could be built.
    pub(crate) fn finish(&self, method: &str, path: &str, started: Instant, mut response: Response) -> Response {
        let exchange = Exchange { method, path, elapsed: started.elapsed() };
        for m in self.middleware.iter().rev() {
            m.after(&exchange, &mut response);
        }
        response
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

fn not_found() -> Response {
    Response::error(Status::NotFound, "Resource not found")
}

fn method_not_allowed(method: Method, allowed: &[Method]) -> Response {
    let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
    let mut res = Response::error(Status::MethodNotAllowed, format!("Method {method} not allowed"));
    res.set_header("allow", allow);
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn ok(_req: Request) -> &'static str { "ok" }

    async fn echo_id(req: Request) -> String {
        req.param("id").unwrap_or_default().to_owned()
    }

    fn router() -> Router {
        Router::new()
            .on(Method::Get, "/items/search", ok)
            .on(Method::Put, "/items/{id}", echo_id)
            .on(Method::Delete, "/items/{id}", echo_id)
    }

    #[tokio::test]
    async fn path_parameters_reach_the_handler() {
        let res = router().handle(Request::builder(Method::Put, "/items/7").build()).await;
        assert_eq!(res.code(), 200);
        assert_eq!(res.body(), b"7");
    }

    #[tokio::test]
    async fn static_segment_beats_parameter() {
        let res = router().handle(Request::builder(Method::Get, "/items/search").build()).await;
        assert_eq!(res.body(), b"ok");
    }

    #[tokio::test]
    async fn unknown_path_is_json_404() {
        let res = router().handle(Request::builder(Method::Get, "/nothing").build()).await;
        assert_eq!(res.code(), 404);
        assert_eq!(res.body(), br#"{"error":"Resource not found"}"#);
    }

    #[tokio::test]
    async fn wrong_method_lists_allowed_ones() {
        let res = router().handle(Request::builder(Method::Patch, "/items/7").build()).await;
        assert_eq!(res.code(), 405);
        assert_eq!(res.header("allow"), Some("DELETE, PUT"));
    }

    #[tokio::test]
    async fn head_is_served_by_get_routes() {
        let res = router().handle(Request::builder(Method::Head, "/items/search").build()).await;
        assert_eq!(res.code(), 200);
    }

    #[tokio::test]
    async fn allow_lists_head_next_to_get() {
        let res = router().handle(Request::builder(Method::Post, "/items/search").build()).await;
        assert_eq!(res.code(), 405);
        assert_eq!(res.header("allow"), Some("GET, HEAD"));
    }

    struct Tag(&'static str);

    impl Middleware for Tag {
        fn after(&self, _exchange: &Exchange<'_>, res: &mut Response) {
            res.set_header("x-tag", self.0);
        }
    }

    #[tokio::test]
    async fn after_hooks_run_in_reverse_order() {
        let router = router().layer(Tag("outer")).layer(Tag("inner"));
        let res = router.handle(Request::builder(Method::Get, "/items/search").build()).await;
        let tags: Vec<&str> = res.headers().iter()
            .filter(|(k, _)| k == "x-tag")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(tags, ["inner", "outer"]);
    }

    #[test]
    fn finish_applies_hooks_to_prebuilt_responses() {
        let router = router().layer(Tag("only"));
        let res = router.finish("BREW", "/items/7", Instant::now(), Response::status(Status::MethodNotAllowed));
        assert_eq!(res.code(), 405);
        assert_eq!(res.header("x-tag"), Some("only"));
    }
}
