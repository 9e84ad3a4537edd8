//! Target platform identifiers.
//!
//! Download URLs for the tools we install are published using Go's
//! `GOOS`/`GOARCH` naming (`darwin`, `amd64`, ...), so the platform is
//! described with those identifiers rather than Rust's target names.

use std::collections::HashMap;

/// Operating system and architecture, using Go naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Operating system (e.g., "linux", "darwin", "windows").
    pub os: String,
    /// Architecture (e.g., "amd64", "arm64").
    pub arch: String,
}

/// Rust `std::env::consts::OS` to `GOOS`.
const OS_NAMES: &[(&str, &str)] = &[
    ("linux", "linux"),
    ("macos", "darwin"),
    ("windows", "windows"),
    ("freebsd", "freebsd"),
    ("netbsd", "netbsd"),
    ("openbsd", "openbsd"),
    ("android", "android"),
    ("ios", "ios"),
];

/// Rust `std::env::consts::ARCH` to `GOARCH`.
const ARCH_NAMES: &[(&str, &str)] = &[
    ("x86_64", "amd64"),
    ("x86", "386"),
    ("aarch64", "arm64"),
    ("arm", "arm"),
    ("powerpc64", "ppc64"),
    ("s390x", "s390x"),
    ("riscv64", "riscv64"),
    ("mips64", "mips64"),
];

fn lookup(table: &[(&str, &str)], key: &str) -> String {
    table
        .iter()
        .find(|(rust, _)| *rust == key)
        .map(|(_, go)| (*go).to_string())
        .unwrap_or_else(|| key.to_string())
}

impl Platform {
    /// Create a platform from explicit Go identifiers.
    pub fn new(os: &str, arch: &str) -> Self {
        Self {
            os: os.to_string(),
            arch: arch.to_string(),
        }
    }

    /// Detect the platform this process is running on.
    pub fn current() -> Self {
        Self {
            os: lookup(OS_NAMES, std::env::consts::OS),
            arch: lookup(ARCH_NAMES, std::env::consts::ARCH),
        }
    }

    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }

    /// File extension carried by executables on this platform.
    pub fn exe_ext(&self) -> &'static str {
        if self.is_windows() {
            ".exe"
        } else {
            ""
        }
    }

    /// Apply vendor-specific renames (e.g., `darwin` → `macOS`).
    ///
    /// Identifiers without an entry are passed through unchanged.
    pub fn with_replacements(
        &self,
        os_replacement: &HashMap<String, String>,
        arch_replacement: &HashMap<String, String>,
    ) -> Self {
        Self {
            os: os_replacement
                .get(&self.os)
                .cloned()
                .unwrap_or_else(|| self.os.clone()),
            arch: arch_replacement
                .get(&self.arch)
                .cloned()
                .unwrap_or_else(|| self.arch.clone()),
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}
