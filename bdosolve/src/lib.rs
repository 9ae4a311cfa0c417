#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod cli;
pub use cli::{AllocationFlag, Cli, Commands, IOArgs};

mod config;
pub use config::AppConfig;

mod request;
pub use request::{ParameterOverrides, Request};

/// Failures specific to the command-line front end
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// `--config` named a file that is not there
    #[error("Config file {} does not exist", .0.display())]
    MissingConfig(std::path::PathBuf),
}
