//! External program execution and environment detection.

pub mod command;

use std::env::VarError;

pub use command::{
    display_command, execute, execute_check, CommandOptions, CommandResult,
};

/// Variables whose presence means the process runs under CI.
const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
];

/// Check for a CI environment with a custom env var lookup function.
///
/// [`ToolsConfig::from_env`](crate::config::ToolsConfig::from_env) passes the
/// real environment.
pub fn is_ci_with<F>(env_fn: F) -> bool
where
    F: Fn(&str) -> Result<String, VarError>,
{
    CI_VARS.iter().any(|&key| env_fn(key).is_ok())
}
