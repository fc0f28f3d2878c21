//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum catch-all, middleware stack)
//!     → routing::Router::resolve(method, raw path)
//!     → matched RouteHandler, or 404 from response.rs
//! ```
//!
//! # Design Decisions
//! - The transport owns protocol concerns (status codes, JSON error bodies);
//!   the route table stays HTTP-response-agnostic
//! - Request IDs attached as early as possible for tracing

pub mod response;
pub mod server;

pub use response::ApiError;
pub use server::HttpServer;
