//! Error types for toolgate operations.
//!
//! This module defines [`ToolsError`], the error type returned by every
//! check and installer, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Library functions never exit the process; they return `ToolsError`
//! - The binary turns any error into a non-zero exit, so a failed check
//!   still stops the build
//! - Use `anyhow::Error` (via `ToolsError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for toolgate operations.
#[derive(Debug, Error)]
pub enum ToolsError {
    /// The toolchain could not be run or did not report a version.
    #[error("could not determine go version: {message}")]
    ToolchainVersion { message: String },

    /// A version string is not a valid semantic version.
    #[error("could not parse go version: '{value}': {message}")]
    VersionParse { value: String, message: String },

    /// A constraint string is not a valid semantic version range.
    #[error("invalid semver constraint: '{constraint}': {message}")]
    ConstraintParse { constraint: String, message: String },

    /// The version parsed fine but is outside the required range.
    #[error("your version of Go, {version}, does not meet the requirement {constraint}")]
    VersionMismatch { version: String, constraint: String },

    /// A URL or path template could not be rendered.
    #[error("invalid template '{template}': {message}")]
    Template { template: String, message: String },

    /// No download is published for this operating system.
    #[error("{tool} is not available for {os}")]
    UnsupportedPlatform { tool: String, os: String },

    /// HTTP request failed or returned a non-success status.
    #[error("failed to download {url}: {message}")]
    Download { url: String, message: String },

    /// An archive could not be unpacked.
    #[error("failed to extract {archive}: {message}")]
    Extract { archive: PathBuf, message: String },

    /// The expected file was not found inside an extracted archive.
    #[error("{member} not found in archive {archive}")]
    ArchiveMemberMissing { archive: String, member: String },

    /// An install step succeeded but the executable is not where expected.
    #[error("{tool} was installed but {path} does not exist")]
    InstalledFileMissing { tool: String, path: PathBuf },

    /// An external command exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for toolgate operations.
pub type Result<T> = std::result::Result<T, ToolsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_parse_displays_value() {
        let err = ToolsError::VersionParse {
            value: "devel".into(),
            message: "unexpected character".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("could not parse go version"));
        assert!(msg.contains("'devel'"));
    }

    #[test]
    fn constraint_parse_displays_constraint() {
        let err = ToolsError::ConstraintParse {
            constraint: ">=abc".into(),
            message: "bad".into(),
        };
        assert!(err.to_string().contains("invalid semver constraint: '>=abc'"));
    }

    #[test]
    fn version_mismatch_displays_version_and_requirement() {
        let err = ToolsError::VersionMismatch {
            version: "1.15.0".into(),
            constraint: ">=1.16".into(),
        };
        assert_eq!(
            err.to_string(),
            "your version of Go, 1.15.0, does not meet the requirement >=1.16"
        );
    }

    #[test]
    fn unsupported_platform_displays_tool_and_os() {
        let err = ToolsError::UnsupportedPlatform {
            tool: "gh".into(),
            os: "plan9".into(),
        };
        assert_eq!(err.to_string(), "gh is not available for plan9");
    }

    #[test]
    fn download_displays_url() {
        let err = ToolsError::Download {
            url: "https://example.com/kind".into(),
            message: "HTTP 404 Not Found".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://example.com/kind"));
        assert!(msg.contains("404"));
    }

    #[test]
    fn archive_member_missing_displays_member() {
        let err = ToolsError::ArchiveMemberMissing {
            archive: "gh_1.8.1_linux_amd64.tar.gz".into(),
            member: "gh_1.8.1_linux_amd64/bin/gh".into(),
        };
        assert!(err.to_string().contains("gh_1.8.1_linux_amd64/bin/gh"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = ToolsError::CommandFailed {
            command: "go install github.com/magefile/mage@latest".into(),
            code: Some(2),
        };
        let msg = err.to_string();
        assert!(msg.contains("go install"));
        assert!(msg.contains("2"));
    }

    #[test]
    fn installed_file_missing_displays_path() {
        let err = ToolsError::InstalledFileMissing {
            tool: "mage".into(),
            path: PathBuf::from("/go/bin/mage"),
        };
        assert_eq!(
            err.to_string(),
            "mage was installed but /go/bin/mage does not exist"
        );
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: ToolsError = io_err.into();
        assert!(matches!(err, ToolsError::Io(_)));
    }

    #[test]
    fn anyhow_error_converts() {
        let err: ToolsError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, ToolsError::Other(_)));
        assert_eq!(err.to_string(), "boom");
    }
}
