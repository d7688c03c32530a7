//! Mode routing
//!
//! - Server mode (HTTP front end), the default
//! - CLI mode (one registry operation per invocation)

pub mod cli;
pub mod server;

pub use cli::run_cli;
pub use server::run_server;
