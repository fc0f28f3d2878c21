//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, raw path)
//!     → router.rs (ordered per-method lookup)
//!     → matcher.rs (walk compiled segments, extract captures)
//!     → Return: (handler, captures) or NoMatch
//!
//! Route Compilation (at startup):
//!     "/delete/<image_id>"
//!     → template.rs (parse into Literal / PathCapture / QueryCapture)
//!     → Append to the method's entry list
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Templates compiled at startup, immutable at runtime
//! - Registration order is precedence: first match wins
//! - Malformed templates abort startup instead of degrading to literals
//! - The `?page=?` form matches query text embedded in the raw path string;
//!   the router never parses a real query string

pub mod matcher;
pub mod router;
pub mod template;

pub use matcher::{CompiledTemplate, RouteParams};
pub use router::Router;
pub use template::CompileError;
