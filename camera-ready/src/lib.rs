pub mod cli;
pub mod load_config;
pub mod openreview;
pub mod snapshot;

pub use cli::{run, Cli, Commands};
