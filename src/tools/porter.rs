//! Porter installer.
//!
//! Unlike gh and kind, porter is always downloaded: the `latest` channel
//! moves, so an installed copy may be stale.

use crate::config::ToolsConfig;
use crate::download::{DownloadOptions, Installer};
use crate::error::Result;
use std::path::PathBuf;

pub const PORTER_URL_TEMPLATE: &str =
    "https://cdn.porter.sh/{{.VERSION}}/porter-{{.GOOS}}-{{.GOARCH}}{{.EXT}}";

/// Download settings for the configured porter channel.
pub fn download_options(config: &ToolsConfig) -> DownloadOptions {
    DownloadOptions::new(
        "porter",
        &config.porter_version,
        config.url_template("porter", PORTER_URL_TEMPLATE),
    )
}

/// Install the latest porter, replacing any existing copy.
pub fn ensure_porter(config: &ToolsConfig) -> Result<PathBuf> {
    let installer = Installer::new(config)?;
    installer.download_to_bin(&download_options(config))
}
