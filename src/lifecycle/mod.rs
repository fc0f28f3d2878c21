//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Open storage → Register routes → Bind
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain connections → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM / Ctrl+C → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, including a route that fails to
//!   compile
//! - Listeners start last (traffic only when storage is ready)

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::watch_signals;
