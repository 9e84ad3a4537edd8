//! toolgate - Go toolchain gate and build tool installer.
//!
//! Build pipelines call into toolgate to fail fast when the Go toolchain is
//! too old and to make sure mage, gh, kind and porter are on the PATH before
//! any real work starts.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Environment-derived settings and URL templates
//! - [`download`] - Release downloads and archive extraction
//! - [`error`] - Error types and result aliases
//! - [`goversion`] - Go version parsing and constraint checks
//! - [`platform`] - Go-style OS/architecture names
//! - [`probe`] - PATH lookup and installed-version probing
//! - [`shell`] - Subprocess execution
//! - [`tools`] - Per-tool installers
//!
//! # Example
//!
//! ```
//! use toolgate::config::{render, TemplateVars};
//! use toolgate::goversion::check_go_version;
//!
//! let vars = TemplateVars {
//!     version: "v0.10.0".to_string(),
//!     goos: "linux".to_string(),
//!     goarch: "amd64".to_string(),
//!     ext: String::new(),
//! };
//! let url = render("kind-{{.GOOS}}-{{.GOARCH}}{{.EXT}}", &vars).unwrap();
//! assert_eq!(url, "kind-linux-amd64");
//!
//! assert!(check_go_version("go1.17.0", ">=1.16").is_ok());
//! assert!(check_go_version("go1.15.0", ">=1.16").is_err());
//! ```

pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod goversion;
pub mod platform;
pub mod probe;
pub mod shell;
pub mod tools;

pub use error::{Result, ToolsError};
