//! Discovery of already-installed tools.
//!
//! An ensure-operation only downloads when its tool cannot be resolved on
//! the search path, optionally at a specific version.
//!
//! # Example
//!
//! ```no_run
//! use toolgate::config::ToolsConfig;
//! use toolgate::probe::is_command_available;
//!
//! let config = ToolsConfig::from_env();
//! if is_command_available(&config, "kind", "v0.10.0", &["--version"]) {
//!     println!("kind v0.10.0 is installed");
//! }
//! ```

use crate::config::ToolsConfig;
use crate::shell::{execute, CommandOptions};
use std::path::{Path, PathBuf};

/// Arguments used to ask a tool for its version when none are given.
pub const DEFAULT_VERSION_ARGS: &[&str] = &["--version"];

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable. `exe_ext` is also
/// tried as a suffix (`gh` → `gh.exe`) when non-empty. Does NOT use the
/// `which` command.
pub fn resolve_tool_path(tool: &str, exe_ext: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    let mut names = vec![tool.to_string()];
    if !exe_ext.is_empty() && !tool.ends_with(exe_ext) {
        names.push(format!("{}{}", tool, exe_ext));
    }

    for dir in path_entries {
        for name in &names {
            let candidate = dir.join(name);
            if candidate.is_file() && is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

/// Check whether `name` is installed, and at `version` when one is given.
///
/// With an empty `version` any resolvable binary counts. Otherwise the
/// binary is run with `version_args` (default `--version`) and its output
/// must contain `version`. A binary that fails to run is treated as absent.
pub fn is_command_available(
    config: &ToolsConfig,
    name: &str,
    version: &str,
    version_args: &[&str],
) -> bool {
    let Some(path) = resolve_tool_path(name, config.platform.exe_ext(), &config.search_path)
    else {
        tracing::debug!("{} not found on PATH", name);
        return false;
    };

    if version.is_empty() {
        tracing::debug!("Found {} at {}", name, path.display());
        return true;
    }

    let args = if version_args.is_empty() {
        DEFAULT_VERSION_ARGS
    } else {
        version_args
    };

    match execute(&path, args, &CommandOptions::captured()) {
        Ok(result) => {
            let found = result.combined_output().contains(version);
            tracing::debug!(
                "Found {} at {}; version {} {}",
                name,
                path.display(),
                version,
                if found { "matches" } else { "does not match" }
            );
            found
        }
        Err(e) => {
            tracing::debug!("Could not run {}: {}", path.display(), e);
            false
        }
    }
}
