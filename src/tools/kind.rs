//! Kubernetes-in-Docker (`kind`) installer.
//!
//! kind is published as a bare executable per platform; the version comes
//! from [`ToolsConfig::kind_version`] (`KIND_VERSION` or the default).

use crate::config::ToolsConfig;
use crate::download::{DownloadOptions, Installer};
use crate::error::Result;
use crate::probe::is_command_available;
use std::path::PathBuf;

pub const KIND_URL_TEMPLATE: &str =
    "https://github.com/kubernetes-sigs/kind/releases/download/{{.VERSION}}/kind-{{.GOOS}}-{{.GOARCH}}";

/// Download settings for the configured kind version.
pub fn download_options(config: &ToolsConfig) -> DownloadOptions {
    DownloadOptions::new(
        "kind",
        &config.kind_version,
        config.url_template("kind", KIND_URL_TEMPLATE),
    )
}

/// Install kind unless it is already on the PATH.
///
/// Returns the installed path, or `None` if nothing was downloaded.
pub fn ensure_kind(config: &ToolsConfig) -> Result<Option<PathBuf>> {
    if is_command_available(config, "kind", "", &[]) {
        tracing::debug!("kind is already installed");
        return Ok(None);
    }

    let installer = Installer::new(config)?;
    installer.download_to_bin(&download_options(config)).map(Some)
}
