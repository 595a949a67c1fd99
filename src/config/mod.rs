//! Runtime configuration for the command-line front end.
pub mod runtime;

pub use runtime::{load_config, parse_cli, InputFormat, OutputConfig, RuntimeConfig};
