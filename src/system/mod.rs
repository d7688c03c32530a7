//! System-level utilities
//!
//! Logging setup shared by every execution mode.

pub mod logging;

pub use logging::init_logging;
