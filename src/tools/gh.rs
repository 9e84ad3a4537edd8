//! GitHub CLI (`gh`) installer.
//!
//! gh ships as an archive whose layout differs by OS: the Windows zip
//! holds `bin/gh.exe` at its root, while the tarballs nest the binary in a
//! versioned directory. macOS builds are published as `macOS`, not `darwin`.

use crate::config::ToolsConfig;
use crate::download::{ArchiveOptions, DownloadOptions, Installer};
use crate::error::Result;
use crate::platform::Platform;
use crate::probe::is_command_available;
use std::collections::HashMap;
use std::path::PathBuf;

pub const GH_URL_TEMPLATE: &str = "https://github.com/cli/cli/releases/download/v{{.VERSION}}/gh_{{.VERSION}}_{{.GOOS}}_{{.GOARCH}}{{.EXT}}";

/// Archive member for any OS not listed in [`TARGET_TEMPLATES`].
const DEFAULT_TARGET_TEMPLATE: &str = "gh_{{.VERSION}}_{{.GOOS}}_{{.GOARCH}}/bin/gh{{.EXT}}";

const TARGET_TEMPLATES: &[(&str, &str)] = &[("windows", "bin/gh.exe")];

const ARCHIVE_EXTENSIONS: &[(&str, &str)] = &[
    ("linux", ".tar.gz"),
    ("darwin", ".tar.gz"),
    ("windows", ".zip"),
];

const OS_REPLACEMENTS: &[(&str, &str)] = &[("darwin", "macOS")];

fn to_map(table: &[(&str, &str)]) -> HashMap<String, String> {
    table
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Path of the gh executable inside the archive for `platform`.
pub fn target_file_template(platform: &Platform) -> &'static str {
    TARGET_TEMPLATES
        .iter()
        .find(|(os, _)| *os == platform.os)
        .map_or(DEFAULT_TARGET_TEMPLATE, |(_, template)| *template)
}

/// Download settings for the configured gh version and platform.
pub fn archive_options(config: &ToolsConfig) -> ArchiveOptions {
    let mut download = DownloadOptions::new(
        "gh",
        &config.gh_version,
        config.url_template("gh", GH_URL_TEMPLATE),
    );
    download.os_replacement = to_map(OS_REPLACEMENTS);

    ArchiveOptions {
        download,
        archive_extensions: to_map(ARCHIVE_EXTENSIONS),
        target_file_template: target_file_template(&config.platform).to_string(),
    }
}

/// Install gh unless it is already on the PATH.
///
/// Returns the installed path, or `None` if nothing was downloaded.
pub fn ensure_github_client(config: &ToolsConfig) -> Result<Option<PathBuf>> {
    if is_command_available(config, "gh", "", &[]) {
        tracing::debug!("gh is already installed");
        return Ok(None);
    }

    let installer = Installer::new(config)?;
    installer
        .download_archive_to_bin(&archive_options(config))
        .map(Some)
}
