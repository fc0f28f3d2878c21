//! Route registration and resolution.
//!
//! # Responsibilities
//! - Compile templates at registration and store them per method
//! - Resolve an incoming (method, path) to a handler plus captures
//! - Return explicit no-match rather than an error
//!
//! # Design Decisions
//! - Immutable after startup registration (thread-safe without locks)
//! - Entries are tried strictly in registration order; first match wins, so
//!   more specific templates must be registered before broader ones
//! - The handler is opaque: the router stores and returns it, never calls it
//! - An unknown method resolves to no match, same as an unregistered path

use axum::http::Method;

use crate::routing::matcher::{CompiledTemplate, RouteParams};
use crate::routing::template::CompileError;

/// Methods the route table accepts.
const SUPPORTED_METHODS: [Method; 3] = [Method::GET, Method::POST, Method::DELETE];

/// One registered route: a compiled matcher and its handler.
#[derive(Debug, Clone)]
struct CompiledRoute<H> {
    template: CompiledTemplate,
    handler: H,
}

/// Pattern-matching dispatch table.
///
/// `H` is any cloneable handler reference; resolution hands back a clone
/// together with the captures extracted from the path.
#[derive(Debug)]
pub struct Router<H> {
    // Indexed in lockstep with SUPPORTED_METHODS.
    routes: [Vec<CompiledRoute<H>>; 3],
}

impl<H: Clone> Router<H> {
    /// Create an empty route table for GET, POST and DELETE.
    pub fn new() -> Self {
        Self {
            routes: [Vec::new(), Vec::new(), Vec::new()],
        }
    }

    fn method_slot(method: &Method) -> Option<usize> {
        SUPPORTED_METHODS.iter().position(|m| m == method)
    }

    /// Compile `template` and append it to `method`'s entry list.
    ///
    /// `handler_name` only feeds the registration diagnostic; the handler
    /// itself stays opaque. Fails on malformed placeholder syntax or an
    /// unsupported method; either should abort startup rather than leave a
    /// partial route table serving.
    pub fn add_route(
        &mut self,
        method: Method,
        template: &str,
        handler: H,
        handler_name: &str,
    ) -> Result<(), CompileError> {
        let slot = Self::method_slot(&method).ok_or_else(|| {
            CompileError::UnsupportedMethod(method.to_string())
        })?;
        let compiled = CompiledTemplate::compile(template)?;
        tracing::info!(%method, template, handler = handler_name, "route registered");
        self.routes[slot].push(CompiledRoute {
            template: compiled,
            handler,
        });
        Ok(())
    }

    /// Resolve `(method, path)` to the first matching handler and its
    /// captures. Pure read; `None` is the routine "no route" outcome.
    pub fn resolve(&self, method: &Method, path: &str) -> Option<(H, RouteParams)> {
        let slot = Self::method_slot(method)?;
        self.routes[slot]
            .iter()
            .find_map(|route| {
                route
                    .template
                    .matches(path)
                    .map(|params| (route.handler.clone(), params))
            })
    }

    /// Number of routes registered for `method`.
    pub fn route_count(&self, method: &Method) -> usize {
        Self::method_slot(method).map_or(0, |slot| self.routes[slot].len())
    }
}

impl<H: Clone> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::template::CompileError;

    fn demo_router() -> Router<&'static str> {
        let mut router = Router::new();
        router.add_route(Method::GET, "/api/images/?page=?", "list", "list").unwrap();
        router.add_route(Method::POST, "/upload/", "upload", "upload").unwrap();
        router.add_route(Method::DELETE, "/delete/<image_id>", "delete", "delete").unwrap();
        router
    }

    #[test]
    fn resolves_registered_routes_with_captures() {
        let router = demo_router();

        let (handler, params) = router.resolve(&Method::GET, "/api/images/?page=3").unwrap();
        assert_eq!(handler, "list");
        assert_eq!(params["page"], "3");

        let (handler, params) = router.resolve(&Method::POST, "/upload/").unwrap();
        assert_eq!(handler, "upload");
        assert!(params.is_empty());

        let (handler, params) = router.resolve(&Method::DELETE, "/delete/ab12-ef").unwrap();
        assert_eq!(handler, "delete");
        assert_eq!(params["image_id"], "ab12-ef");
    }

    #[test]
    fn empty_capture_never_matches() {
        let router = demo_router();
        assert!(router.resolve(&Method::DELETE, "/delete/").is_none());
    }

    #[test]
    fn unknown_method_resolves_to_none() {
        let router = demo_router();
        assert!(router.resolve(&Method::PATCH, "/upload/").is_none());
    }

    #[test]
    fn unregistered_path_resolves_to_none() {
        let router = demo_router();
        assert!(router.resolve(&Method::GET, "/nonexistent").is_none());
    }

    #[test]
    fn empty_table_resolves_to_none() {
        let router: Router<&'static str> = Router::new();
        assert!(router.resolve(&Method::GET, "/upload/").is_none());
    }

    #[test]
    fn first_registered_route_wins() {
        let mut router = Router::new();
        router.add_route(Method::GET, "/img/<a>", "broad", "broad").unwrap();
        router.add_route(Method::GET, "/img/cats", "specific", "specific").unwrap();

        // Both templates match; registration order decides.
        let (handler, _) = router.resolve(&Method::GET, "/img/cats").unwrap();
        assert_eq!(handler, "broad");

        // Reversed registration flips the winner.
        let mut router = Router::new();
        router.add_route(Method::GET, "/img/cats", "specific", "specific").unwrap();
        router.add_route(Method::GET, "/img/<a>", "broad", "broad").unwrap();
        let (handler, _) = router.resolve(&Method::GET, "/img/cats").unwrap();
        assert_eq!(handler, "specific");
    }

    #[test]
    fn resolve_is_idempotent() {
        let router = demo_router();
        let first = router.resolve(&Method::GET, "/api/images/?page=7");
        // Interleave other lookups, then repeat the original.
        let _ = router.resolve(&Method::DELETE, "/delete/x");
        let _ = router.resolve(&Method::GET, "/nope");
        let second = router.resolve(&Method::GET, "/api/images/?page=7");
        assert_eq!(first.as_ref().map(|(h, p)| (*h, p.clone())),
                   second.as_ref().map(|(h, p)| (*h, p.clone())));
    }

    #[test]
    fn add_route_rejects_malformed_template() {
        let mut router: Router<&'static str> = Router::new();
        assert!(matches!(
            router.add_route(Method::GET, "/x/<broken", "h", "h"),
            Err(CompileError::UnterminatedCapture(_))
        ));
        assert_eq!(router.route_count(&Method::GET), 0);
    }

    #[test]
    fn add_route_rejects_unsupported_method() {
        let mut router: Router<&'static str> = Router::new();
        assert!(matches!(
            router.add_route(Method::PUT, "/x", "h", "h"),
            Err(CompileError::UnsupportedMethod(_))
        ));
    }
}
