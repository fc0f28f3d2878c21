//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via the tracing crate everywhere
//! - RUST_LOG wins over the configured filter
//! - No metrics endpoint; request traces carry the request ID instead

pub mod logging;

pub use logging::init_logging;
