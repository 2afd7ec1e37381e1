use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

use super::{Exchange, Middleware};

/// Cross-origin resource sharing.
///
/// Answers every `OPTIONS` request as a preflight (204, no handler invoked)
/// and stamps `access-control-allow-origin` on every response.
pub struct Cors {
    allowed_origin: String,
    allowed_methods: Vec<Method>,
    max_age_secs: u32,
}

impl Cors {
    /// Any origin, the methods the posts API uses, one-day preflight cache.
    pub fn permissive() -> Self {
        Self {
            allowed_origin: "*".to_owned(),
            allowed_methods: vec![
                Method::Get,
                Method::Post,
                Method::Put,
                Method::Delete,
                Method::Options,
            ],
            max_age_secs: 86_400,
        }
    }

    fn allow_methods(&self) -> String {
        self.allowed_methods.iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Middleware for Cors {
    fn before(&self, req: &Request) -> Option<Response> {
        if req.method() != Method::Options {
            return None;
        }
        // Mirror whatever the browser asked for; the policy is open anyway.
        let allow_headers = req.header("access-control-request-headers").unwrap_or("content-type");
        Some(
            Response::builder()
                .status(Status::NoContent)
                .header("access-control-allow-methods", &self.allow_methods())
                .header("access-control-allow-headers", allow_headers)
                .header("access-control-max-age", &self.max_age_secs.to_string())
                .no_body(),
        )
    }

    fn after(&self, _exchange: &Exchange<'_>, res: &mut Response) {
        res.set_header("access-control-allow-origin", self.allowed_origin.as_str());
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn preflight_short_circuits_with_204() {
        let req = Request::builder(Method::Options, "/api/posts")
            .header("Access-Control-Request-Headers", "content-type, x-trace")
            .build();
        let res = Cors::permissive().before(&req).expect("preflight answered");
        assert_eq!(res.code(), 204);
        assert_eq!(res.header("access-control-allow-methods"), Some("GET, POST, PUT, DELETE, OPTIONS"));
        assert_eq!(res.header("access-control-allow-headers"), Some("content-type, x-trace"));
        assert_eq!(res.header("access-control-max-age"), Some("86400"));
    }

    #[test]
    fn other_methods_pass_through() {
        let req = Request::builder(Method::Get, "/api/posts").build();
        assert!(Cors::permissive().before(&req).is_none());
    }

    #[test]
    fn every_response_gets_allow_origin() {
        let mut res = Response::status(Status::NotFound);
        let exchange = Exchange { method: "BREW", path: "/nope", elapsed: Duration::ZERO };
        Cors::permissive().after(&exchange, &mut res);
        assert_eq!(res.header("access-control-allow-origin"), Some("*"));
    }
}
