//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use serde::de::DeserializeOwned;

use crate::error::RequestError;
use crate::method::Method;

/// An incoming HTTP request with its body fully buffered.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    /// Starts building a request by hand. `target` is a path with an optional
    /// query string, e.g. `/api/posts?sort=title`.
    ///
    /// The server never uses this; it exists for driving a
    /// [`Router`](crate::Router) in-process.
    pub fn builder(method: Method, target: &str) -> RequestBuilder {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (target, Vec::new()),
        };
        RequestBuilder {
            request: Self {
                method,
                path: path.to_owned(),
                query,
                headers: Vec::new(),
                body: Bytes::new(),
                params: HashMap::new(),
            },
        }
    }

    /// Buffers a hyper request into a [`Request`].
    pub(crate) async fn from_hyper(req: hyper::Request<Incoming>) -> Result<Self, RequestError> {
        let (parts, body) = req.into_parts();

        let method = parts.method.as_str().parse::<Method>()
            .map_err(|()| RequestError::UnsupportedMethod(parts.method.to_string()))?;

        let body = body.collect().await.map_err(RequestError::Body)?.to_bytes();

        // Header values that are not visible ASCII are dropped rather than
        // failing the whole request.
        let headers = parts.headers.iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_owned(), v.to_owned())))
            .collect();

        Ok(Self {
            method,
            path: parts.uri.path().to_owned(),
            query: parts.uri.query().map(parse_query).unwrap_or_default(),
            headers,
            body,
            params: HashMap::new(),
        })
    }

    pub(crate) fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/api/posts/{id}`, `req.param("id")` on `/api/posts/42`
    /// returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns the first value of a query-string parameter, percent-decoded.
    ///
    /// Empty values are reported as absent: `?sort=` behaves like no `sort`.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Decodes the body as JSON.
    ///
    /// Returns `Ok(None)` when the body is empty (or only whitespace) or is
    /// the JSON literal `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice::<Option<T>>(&self.body)
    }
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Fluent builder for [`Request`]. Obtain via [`Request::builder`].
pub struct RequestBuilder {
    request: Request,
}

impl RequestBuilder {
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.request.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.request.body = body.into();
        self
    }

    pub fn build(self) -> Request {
        self.request
    }
}
