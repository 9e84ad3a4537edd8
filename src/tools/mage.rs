//! Mage installer.
//!
//! mage is a Go program, so it is installed with the Go toolchain itself
//! (`go install`) into the configured bin directory.

use crate::config::ToolsConfig;
use crate::error::{Result, ToolsError};
use crate::probe::is_command_available;
use crate::shell::{execute_check, CommandOptions};
use std::fs;
use std::path::PathBuf;

/// Go module path of the mage command.
pub const MAGE_MODULE: &str = "github.com/magefile/mage";

/// Arguments for `go install` of the requested mage version.
pub fn install_args(version: &str) -> Vec<String> {
    let version = if version.is_empty() { "latest" } else { version };
    vec!["install".to_string(), format!("{}@{}", MAGE_MODULE, version)]
}

/// Install mage unless a matching version is already on the PATH.
///
/// An empty [`ToolsConfig::mage_version`] accepts any installed mage.
/// Returns the installed path, or `None` if nothing was installed.
pub fn ensure_mage(config: &ToolsConfig) -> Result<Option<PathBuf>> {
    if is_command_available(config, "mage", &config.mage_version, &["-version"]) {
        tracing::debug!("mage is already installed");
        return Ok(None);
    }

    let args = install_args(&config.mage_version);
    tracing::info!("Installing mage with {} {}", config.go_command, args.join(" "));

    fs::create_dir_all(&config.bin_dir)?;
    let mut options = CommandOptions::default();
    options.env.insert(
        "GOBIN".to_string(),
        config.bin_dir.to_string_lossy().into_owned(),
    );
    execute_check(&config.go_command, args.as_slice(), &options)?;

    let dest = config
        .bin_dir
        .join(format!("mage{}", config.platform.exe_ext()));
    if !dest.is_file() {
        return Err(ToolsError::InstalledFileMissing {
            tool: "mage".to_string(),
            path: dest,
        });
    }
    tracing::info!("Installed mage to {}", dest.display());
    Ok(Some(dest))
}
