//! subcli - Subcommand-style argument parsing with groups, help topics and examples.
//!
//! An [`App`] holds a registry of commands, each with its own flag catalog
//! and handler. Running the app resolves the first argument to a command,
//! parses the remaining tokens into a [`Context`] and hands it to the handler.

pub mod app;
pub mod config;
pub mod context;
pub mod help;
pub mod output;
pub mod parser;
pub mod registry;

pub use app::{App, UsageError, USAGE_EXIT_CODE};
pub use config::{
    find_flag, AppConfig, CommandConfig, ConfigError, ExampleConfig, FlagConfig, TopicConfig,
};
pub use context::Context;
pub use help::{command_help, command_usage, flag_usage, global_help, version_line};
pub use output::{render_context_json, Console};
pub use parser::{parse_args, ParseError, ParseResult};
pub use registry::{Command, Group, Handler, Registry, RegistryError};
