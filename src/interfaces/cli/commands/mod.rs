//! CLI command implementations

mod config_gen;
mod import;
mod maintenance;

pub use config_gen::*;
pub use import::*;
pub use maintenance::*;
