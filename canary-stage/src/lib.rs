pub mod cli;
pub mod load_manifest;

pub use cli::{run, Cli, LogLevel};
