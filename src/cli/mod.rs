//! Command-line interface for toolgate.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`dispatcher`] - Routes subcommands to library operations

pub mod args;
pub mod dispatcher;

pub use args::{Cli, Commands, GoVersionArgs, KindArgs};
pub use dispatcher::CommandDispatcher;
