//! Configuration for the tool checks and installers.
//!
//! Everything the installers would otherwise read ad hoc from the process
//! environment is collected once into a [`ToolsConfig`] and passed to each
//! operation:
//! - Tool versions in [`ToolsConfig`] (with defaults below)
//! - URL/path placeholder rendering in [`template`]
//!
//! # Example
//!
//! ```
//! use toolgate::config::{ToolsConfig, DEFAULT_KIND_VERSION};
//!
//! let config = ToolsConfig::from_env_with(|_| Err(std::env::VarError::NotPresent));
//! assert_eq!(config.kind_version, DEFAULT_KIND_VERSION);
//! ```
//!
//! # Environment Variables
//!
//! - `KIND_VERSION` - kind version to install
//! - `GOBIN`, then `GOPATH` - where binaries are installed
//! - `PATH` - where existing binaries are looked up
//! - `GO` - go command to run

pub mod template;

pub use template::{parse_template, render, Segment, TemplateVars};

use crate::platform::Platform;
use crate::shell::is_ci_with;
use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

/// Version of kind to install if not already present.
pub const DEFAULT_KIND_VERSION: &str = "v0.10.0";

/// Version of the GitHub CLI to install if not already present.
pub const DEFAULT_GH_VERSION: &str = "1.8.1";

/// Porter is always installed from the `latest` channel.
pub const DEFAULT_PORTER_VERSION: &str = "latest";

/// Process-wide settings for tool checks and installs.
#[derive(Debug, Clone)]
pub struct ToolsConfig {
    /// kind version (from `KIND_VERSION` or [`DEFAULT_KIND_VERSION`]).
    pub kind_version: String,
    /// GitHub CLI version.
    pub gh_version: String,
    /// Porter version or channel.
    pub porter_version: String,
    /// Required mage version; empty accepts any installed mage.
    pub mage_version: String,
    /// Directory that downloaded executables are written to.
    pub bin_dir: PathBuf,
    /// Directories searched for already-installed tools.
    pub search_path: Vec<PathBuf>,
    /// Go command used for version checks and `go install`.
    pub go_command: String,
    /// Platform used to resolve download URLs.
    pub platform: Platform,
    /// Show a spinner while downloading.
    pub show_progress: bool,
    /// Download URL templates replacing a tool's built-in one, keyed by
    /// tool name (e.g., a release mirror).
    pub url_templates: HashMap<String, String>,
}

impl ToolsConfig {
    /// Build the configuration from the real process environment.
    pub fn from_env() -> Self {
        Self::from_env_with(|key: &str| std::env::var(key))
    }

    /// Build the configuration with a custom env var lookup function.
    pub fn from_env_with<F>(env_fn: F) -> Self
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let kind_version = env_fn("KIND_VERSION")
            .unwrap_or_else(|_| DEFAULT_KIND_VERSION.to_string());

        let search_path = env_fn("PATH")
            .map(|path| std::env::split_paths(&path).collect())
            .unwrap_or_default();

        let go_command = env_fn("GO")
            .ok()
            .filter(|go| !go.is_empty())
            .unwrap_or_else(|| "go".to_string());

        Self {
            kind_version,
            gh_version: DEFAULT_GH_VERSION.to_string(),
            porter_version: DEFAULT_PORTER_VERSION.to_string(),
            mage_version: String::new(),
            bin_dir: resolve_bin_dir(&env_fn),
            search_path,
            go_command,
            platform: Platform::current(),
            show_progress: !is_ci_with(&env_fn),
            url_templates: HashMap::new(),
        }
    }

    /// Override the install directory.
    pub fn with_bin_dir(mut self, bin_dir: impl Into<PathBuf>) -> Self {
        self.bin_dir = bin_dir.into();
        self
    }

    /// Override the directories searched for existing tools.
    pub fn with_search_path(mut self, search_path: Vec<PathBuf>) -> Self {
        self.search_path = search_path;
        self
    }

    /// Override the target platform.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Enable or disable the download spinner.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Download `tool` from `template` instead of its release URL.
    pub fn with_url_template(mut self, tool: &str, template: impl Into<String>) -> Self {
        self.url_templates.insert(tool.to_string(), template.into());
        self
    }

    /// URL template for `tool`: the override if one is set, else `default`.
    pub fn url_template<'a>(&'a self, tool: &str, default: &'a str) -> &'a str {
        self.url_templates
            .get(tool)
            .map_or(default, String::as_str)
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Resolve the Go binary directory: `GOBIN`, then the first `GOPATH`
/// entry's `bin`, then `~/go/bin`.
fn resolve_bin_dir<F>(env_fn: &F) -> PathBuf
where
    F: Fn(&str) -> Result<String, VarError>,
{
    if let Ok(gobin) = env_fn("GOBIN") {
        if !gobin.is_empty() {
            return PathBuf::from(gobin);
        }
    }

    if let Ok(gopath) = env_fn("GOPATH") {
        if let Some(first) = std::env::split_paths(&gopath).find(|p| !p.as_os_str().is_empty()) {
            return first.join("bin");
        }
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("go")
        .join("bin")
}
