//! Downloading tool binaries into the Go bin directory.
//!
//! [`Installer`] fetches a URL-templated file over HTTP and places it in
//! the configured bin directory as an executable. Archives are handled in
//! [`archive`].
//!
//! Downloads are blocking and attempted once; there is no retry, caching
//! or checksum verification.

pub mod archive;

pub use archive::{extract, ArchiveOptions};

use crate::config::{render, TemplateVars, ToolsConfig};
use crate::error::{Result, ToolsError};
use crate::platform::Platform;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

/// Where and how to download a single tool.
#[derive(Debug, Clone, Default)]
pub struct DownloadOptions {
    /// URL with `{{.VERSION}}`, `{{.GOOS}}`, `{{.GOARCH}}`, `{{.EXT}}` placeholders.
    pub url_template: String,
    /// Executable name, without extension.
    pub name: String,
    /// Version substituted for `{{.VERSION}}`.
    pub version: String,
    /// Vendor-specific names for `GOOS` values (e.g., darwin → macOS).
    pub os_replacement: HashMap<String, String>,
    /// Vendor-specific names for `GOARCH` values.
    pub arch_replacement: HashMap<String, String>,
}

impl DownloadOptions {
    /// Create options with no platform renames.
    pub fn new(name: &str, version: &str, url_template: &str) -> Self {
        Self {
            url_template: url_template.to_string(),
            name: name.to_string(),
            version: version.to_string(),
            ..Default::default()
        }
    }

    /// Template values for `platform`, with renames applied.
    pub fn template_vars(&self, platform: &Platform, ext: &str) -> TemplateVars {
        let renamed = platform.with_replacements(&self.os_replacement, &self.arch_replacement);
        TemplateVars {
            version: self.version.clone(),
            goos: renamed.os,
            goarch: renamed.arch,
            ext: ext.to_string(),
        }
    }

    /// Resolve the download URL for `platform`.
    pub fn render_url(&self, platform: &Platform, ext: &str) -> Result<String> {
        render(&self.url_template, &self.template_vars(platform, ext))
    }
}

/// Downloads tools into a bin directory.
pub struct Installer {
    client: Client,
    platform: Platform,
    bin_dir: PathBuf,
    show_progress: bool,
}

impl Installer {
    /// Create an installer for the configured platform and bin directory.
    pub fn new(config: &ToolsConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("toolgate/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(30))
            .timeout(None::<Duration>)
            .build()
            .map_err(anyhow::Error::from)?;

        Ok(Self {
            client,
            platform: config.platform.clone(),
            bin_dir: config.bin_dir.clone(),
            show_progress: config.show_progress,
        })
    }

    /// Directory executables are installed into.
    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    /// Target platform.
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Installed location for `name` (`<bin_dir>/<name><exe ext>`).
    pub fn bin_path(&self, name: &str) -> PathBuf {
        self.bin_dir
            .join(format!("{}{}", name, self.platform.exe_ext()))
    }

    /// Download a raw executable into the bin directory.
    ///
    /// `{{.EXT}}` renders as the platform's executable extension. Returns
    /// the installed path.
    pub fn download_to_bin(&self, opts: &DownloadOptions) -> Result<PathBuf> {
        let url = opts.render_url(&self.platform, self.platform.exe_ext())?;
        tracing::info!("Installing {} {}", opts.name, opts.version);

        fs::create_dir_all(&self.bin_dir)?;
        let dest = self.bin_path(&opts.name);

        let mut staged = NamedTempFile::new_in(&self.bin_dir)?;
        self.fetch(&url, staged.as_file_mut())?;
        staged.persist(&dest).map_err(|e| ToolsError::Io(e.error))?;
        make_executable(&dest)?;

        tracing::info!("Installed {} to {}", opts.name, dest.display());
        Ok(dest)
    }

    /// GET `url` and stream the body into `dest`.
    fn fetch(&self, url: &str, dest: &mut dyn Write) -> Result<u64> {
        tracing::info!("Downloading {}", url);
        let download_error = |message: String| ToolsError::Download {
            url: url.to_string(),
            message,
        };

        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| download_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(download_error(format!("HTTP {}", response.status())));
        }

        let bar = self.progress_bar(response.content_length(), url);
        let mut writer = bar.wrap_write(dest);
        let written = response
            .copy_to(&mut writer)
            .map_err(|e| download_error(e.to_string()))?;
        bar.finish_and_clear();

        tracing::debug!("Downloaded {} bytes from {}", written, url);
        Ok(written)
    }

    fn progress_bar(&self, total: Option<u64>, url: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let file = url.rsplit('/').next().unwrap_or(url).to_string();
        let bar = match total {
            Some(len) => {
                let bar = ProgressBar::new(len);
                if let Ok(style) = ProgressStyle::with_template(
                    "{spinner:.magenta} {msg} {bytes}/{total_bytes} ({bytes_per_sec})",
                ) {
                    bar.set_style(style);
                }
                bar
            }
            None => ProgressBar::new_spinner(),
        };
        bar.set_message(file);
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    }
}

/// Copy `src` to `dest` and mark it executable.
pub(crate) fn install_file(src: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dest)?;
    make_executable(dest)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    fn config(bin_dir: &Path, platform: Platform) -> ToolsConfig {
        ToolsConfig::from_env_with(|_| Err(std::env::VarError::NotPresent))
            .with_bin_dir(bin_dir)
            .with_platform(platform)
            .with_progress(false)
    }

    #[test]
    fn template_vars_apply_replacements() {
        let mut opts = DownloadOptions::new("gh", "1.8.1", "");
        opts.os_replacement
            .insert("darwin".to_string(), "macOS".to_string());

        let vars = opts.template_vars(&Platform::new("darwin", "arm64"), ".tar.gz");
        assert_eq!(vars.version, "1.8.1");
        assert_eq!(vars.goos, "macOS");
        assert_eq!(vars.goarch, "arm64");
        assert_eq!(vars.ext, ".tar.gz");
    }

    #[test]
    fn render_url_substitutes_all_fields() {
        let opts = DownloadOptions::new(
            "porter",
            "latest",
            "https://cdn.porter.sh/{{.VERSION}}/porter-{{.GOOS}}-{{.GOARCH}}{{.EXT}}",
        );
        let url = opts
            .render_url(&Platform::new("windows", "amd64"), ".exe")
            .unwrap();
        assert_eq!(url, "https://cdn.porter.sh/latest/porter-windows-amd64.exe");
    }

    #[test]
    fn bin_path_adds_exe_on_windows() {
        let temp = TempDir::new().unwrap();
        let windows = Installer::new(&config(temp.path(), Platform::new("windows", "amd64"))).unwrap();
        assert_eq!(windows.bin_path("kind"), temp.path().join("kind.exe"));

        let linux = Installer::new(&config(temp.path(), Platform::new("linux", "amd64"))).unwrap();
        assert_eq!(linux.bin_path("kind"), temp.path().join("kind"));
    }

    #[test]
    fn download_to_bin_writes_executable() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/v0.10.0/kind-linux-amd64");
            then.status(200).body("#!/bin/sh\necho kind v0.10.0\n");
        });

        let temp = TempDir::new().unwrap();
        let bin_dir = temp.path().join("bin");
        let installer =
            Installer::new(&config(&bin_dir, Platform::new("linux", "amd64"))).unwrap();
        let opts = DownloadOptions::new(
            "kind",
            "v0.10.0",
            &format!("{}/{{{{.VERSION}}}}/kind-{{{{.GOOS}}}}-{{{{.GOARCH}}}}", server.base_url()),
        );

        let path = installer.download_to_bin(&opts).unwrap();

        mock.assert();
        assert_eq!(path, bin_dir.join("kind"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "#!/bin/sh\necho kind v0.10.0\n"
        );
        #[cfg(unix)]
        assert!(crate::probe::is_executable(&path));
    }

    #[test]
    fn download_to_bin_replaces_existing_file() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/porter");
            then.status(200).body("new");
        });

        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("porter"), "old").unwrap();
        let installer =
            Installer::new(&config(temp.path(), Platform::new("linux", "amd64"))).unwrap();
        let opts = DownloadOptions::new("porter", "latest", &server.url("/porter"));

        let path = installer.download_to_bin(&opts).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "new");
    }

    #[test]
    fn download_to_bin_fails_on_404() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("Not Found");
        });

        let temp = TempDir::new().unwrap();
        let installer =
            Installer::new(&config(temp.path(), Platform::new("linux", "amd64"))).unwrap();
        let opts = DownloadOptions::new("kind", "v0.0.0", &server.url("/missing"));

        let err = installer.download_to_bin(&opts).unwrap_err();
        assert!(matches!(err, ToolsError::Download { .. }));
        assert!(err.to_string().contains("404"), "Error should mention 404: {}", err);
        assert!(!temp.path().join("kind").exists());
    }

    #[test]
    fn download_to_bin_rejects_bad_template() {
        let temp = TempDir::new().unwrap();
        let installer =
            Installer::new(&config(temp.path(), Platform::new("linux", "amd64"))).unwrap();
        let opts = DownloadOptions::new("kind", "v0.10.0", "https://example.com/{{.CHANNEL}}");

        let err = installer.download_to_bin(&opts).unwrap_err();
        assert!(matches!(err, ToolsError::Template { .. }));
    }

    #[test]
    fn install_file_copies_and_creates_parent() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("gh");
        fs::write(&src, "binary").unwrap();
        let dest = temp.path().join("nested").join("bin").join("gh");

        install_file(&src, &dest).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "binary");
    }
}
