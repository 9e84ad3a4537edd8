//! Installing a binary that ships inside an archive.
//!
//! The archive is downloaded and unpacked in a private temporary directory,
//! one member is copied into the bin directory, and the temporary directory
//! is removed when the install returns.

use super::{install_file, DownloadOptions, Installer};
use crate::config::render;
use crate::error::{Result, ToolsError};
use crate::platform::Platform;
use flate2::read::GzDecoder;
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tar::Archive as TarArchive;

/// Where to download an archive and which file to take out of it.
#[derive(Debug, Clone, Default)]
pub struct ArchiveOptions {
    pub download: DownloadOptions,
    /// Archive extension per `GOOS` (e.g., linux → `.tar.gz`). An OS
    /// without an entry is unsupported.
    pub archive_extensions: HashMap<String, String>,
    /// Path of the executable inside the archive. Rendered with the same
    /// placeholders as the URL, except `{{.EXT}}` is the executable
    /// extension.
    pub target_file_template: String,
}

impl ArchiveOptions {
    /// Archive extension published for `platform`.
    pub fn archive_extension(&self, platform: &Platform) -> Result<&str> {
        self.archive_extensions
            .get(&platform.os)
            .map(String::as_str)
            .ok_or_else(|| ToolsError::UnsupportedPlatform {
                tool: self.download.name.clone(),
                os: platform.os.clone(),
            })
    }

    /// Resolve the member path for `platform`.
    pub fn render_target(&self, platform: &Platform) -> Result<String> {
        render(
            &self.target_file_template,
            &self.download.template_vars(platform, platform.exe_ext()),
        )
    }
}

impl Installer {
    /// Download an archive, extract it, and install one member.
    ///
    /// Returns the installed path.
    pub fn download_archive_to_bin(&self, opts: &ArchiveOptions) -> Result<PathBuf> {
        let platform = self.platform();
        let archive_ext = opts.archive_extension(platform)?;
        let url = opts.download.render_url(platform, archive_ext)?;
        let target = opts.render_target(platform)?;
        tracing::info!("Installing {} {}", opts.download.name, opts.download.version);

        let workdir = tempfile::tempdir()?;
        let archive_name = url
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .map(String::from)
            .unwrap_or_else(|| format!("{}{}", opts.download.name, archive_ext));
        let archive_path = workdir.path().join(&archive_name);

        {
            let mut file = File::create(&archive_path)?;
            self.fetch(&url, &mut file)?;
        }

        let extract_dir = workdir.path().join("extracted");
        extract(&archive_path, &extract_dir)?;

        let member = extract_dir.join(&target);
        if !member.is_file() {
            return Err(ToolsError::ArchiveMemberMissing {
                archive: archive_name,
                member: target,
            });
        }
        tracing::debug!("Found {} in {}", target, archive_name);

        let dest = self.bin_path(&opts.download.name);
        install_file(&member, &dest)?;

        tracing::info!("Installed {} to {}", opts.download.name, dest.display());
        Ok(dest)
    }
}

/// Unpack `archive` into `dest`, choosing the format by file name.
///
/// Supports `.tar.gz`, `.tgz` and `.zip`.
pub fn extract(archive: &Path, dest: &Path) -> Result<()> {
    let name = archive
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    fs::create_dir_all(dest)?;

    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        extract_tar_gz(archive, dest)
    } else if name.ends_with(".zip") {
        extract_zip(archive, dest)
    } else {
        Err(ToolsError::Extract {
            archive: archive.to_path_buf(),
            message: "unsupported archive format".to_string(),
        })
    }
}

fn extract_tar_gz(archive: &Path, dest: &Path) -> Result<()> {
    tracing::debug!("Unpacking {} into {}", archive.display(), dest.display());
    let file = File::open(archive)?;
    let mut tar = TarArchive::new(GzDecoder::new(file));
    tar.unpack(dest).map_err(|e| ToolsError::Extract {
        archive: archive.to_path_buf(),
        message: e.to_string(),
    })
}

fn extract_zip(archive: &Path, dest: &Path) -> Result<()> {
    tracing::debug!("Unzipping {} into {}", archive.display(), dest.display());
    let extract_error = |message: String| ToolsError::Extract {
        archive: archive.to_path_buf(),
        message,
    };

    let file = File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| extract_error(e.to_string()))?;
    zip.extract(dest).map_err(|e| extract_error(e.to_string()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    /// Build a gzipped tarball containing `(path, contents)` entries.
    pub fn tar_gz(entries: &[(&str, &str)]) -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (path, contents) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder
                .append_data(&mut header, path, contents.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    /// Build a zip archive containing `(path, contents)` entries.
    pub fn zip(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for (path, contents) in entries {
            writer
                .start_file(*path, zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }
}
