//! HTTP server setup and dispatch.
//!
//! # Responsibilities
//! - Build the axum catch-all that forwards every request to the route table
//! - Wire up middleware (tracing, timeout, request ID, body limit)
//! - Register the image-hosting routes at startup
//! - Translate "no route matched" into a 404 response
//!
//! # Design Decisions
//! - One dispatch handler; the custom `Router` decides everything else
//! - Dispatch resolves against the RAW path including query text, so the
//!   `?page=?` template matches the literal string, as registered
//! - Route registration failures abort startup; the process never serves a
//!   partial route table

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{Method, Request},
    response::{IntoResponse, Response},
    routing::any,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::handlers::{
    DeleteImageHandler, DynHandler, ListImagesHandler, RequestContext, RouteHandler, UploadHandler,
};
use crate::http::response::ApiError;
use crate::routing::{CompileError, Router};
use crate::storage::{ImageDirectory, ImageStore};

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<Router<DynHandler>>,
}

/// HTTP server for the image-hosting backend.
pub struct HttpServer {
    app: axum::Router,
}

impl HttpServer {
    /// Build the server: construct the handlers, register the routes and
    /// assemble the middleware stack. Fails fast on a broken route table.
    pub fn new(
        config: &ServerConfig,
        store: ImageStore,
        images: ImageDirectory,
    ) -> Result<Self, CompileError> {
        let mut router = Router::new();
        register_routes(&mut router, config, store, images)?;

        let state = AppState {
            router: Arc::new(router),
        };
        Ok(Self {
            app: Self::build_router(config, state),
        })
    }

    /// Build the axum router with all middleware layers.
    fn build_router(config: &ServerConfig, state: AppState) -> axum::Router {
        axum::Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            // Multipart framing overhead on top of the file itself.
            .layer(DefaultBodyLimit::max(config.upload.max_file_size + 64 * 1024))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Register the image-hosting routes, most specific first.
fn register_routes(
    router: &mut Router<DynHandler>,
    config: &ServerConfig,
    store: ImageStore,
    images: ImageDirectory,
) -> Result<(), CompileError> {
    let list: DynHandler = Arc::new(ListImagesHandler::new(store.clone()));
    let upload: DynHandler = Arc::new(UploadHandler::new(
        store.clone(),
        images.clone(),
        config.upload.clone(),
        &config.storage,
    ));
    let delete: DynHandler = Arc::new(DeleteImageHandler::new(store, images));

    let name = list.name();
    router.add_route(Method::GET, "/api/images/?page=?", list, name)?;
    let name = upload.name();
    router.add_route(Method::POST, "/upload/", upload, name)?;
    let name = delete.name();
    router.add_route(Method::DELETE, "/delete/<image_id>", delete, name)?;
    Ok(())
}

/// Single entry point for every request.
///
/// Resolves (method, raw path) against the route table and invokes the
/// matched handler; no match is the transport's 404, never the router's.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let method = request.method().clone();
    // Raw path INCLUDING the query text: `?page=?` templates match against
    // the literal string, the router never parses a query.
    let raw_path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    match state.router.resolve(&method, &raw_path) {
        Some((handler, params)) => {
            tracing::debug!(%method, path = %raw_path, handler = handler.name(), "request dispatched");
            handler.handle(RequestContext { request }, params).await
        }
        None => {
            tracing::warn!(%method, path = %raw_path, "no route matched");
            ApiError::not_found("Not Found").into_response()
        }
    }
}
