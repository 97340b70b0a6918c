//! CLI command handling

pub mod config_source;
pub mod output;
pub mod send;

pub use config_source::*;
pub use output::*;
pub use send::*;
