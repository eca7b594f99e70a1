//! Application runtime
//!
//! - `server`: HTTP server with background maintenance

pub mod server;

pub use server::run_server;
