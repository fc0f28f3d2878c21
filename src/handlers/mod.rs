//! Route handler collaborators.
//!
//! # Data Flow
//! ```text
//! http::server dispatch
//!     → Router::resolve returns Arc<dyn RouteHandler> + captures
//!     → handler.handle(RequestContext, RouteParams)
//!     → images.rs / upload.rs / delete.rs do the actual work
//!     → storage (metadata rows) + image directory (files)
//! ```
//!
//! # Design Decisions
//! - One trait object per route; dependencies injected at construction, no
//!   ambient globals
//! - Handlers receive captures as plain strings and do their own parsing
//! - Missing optional captures are the handler's problem (absent `page`
//!   means page 1), never the router's

pub mod delete;
pub mod images;
pub mod upload;

pub use delete::DeleteImageHandler;
pub use images::ListImagesHandler;
pub use upload::UploadHandler;

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;

use crate::routing::RouteParams;

/// The incoming request, handed through dispatch untouched.
///
/// Opaque to the router; only the matched handler looks inside (the upload
/// handler consumes the body as multipart).
pub struct RequestContext {
    pub request: Request<Body>,
}

/// A route endpoint: takes the request context plus the captures extracted
/// from the path, produces the HTTP response.
#[async_trait]
pub trait RouteHandler: Send + Sync {
    /// Stable name for registration diagnostics.
    fn name(&self) -> &'static str;

    async fn handle(&self, ctx: RequestContext, params: RouteParams) -> Response;
}

/// Handler reference as stored in the route table.
pub type DynHandler = Arc<dyn RouteHandler>;
