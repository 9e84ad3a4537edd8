//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};

/// toolgate - Go version gate and tool installer for build pipelines.
#[derive(Debug, Parser)]
#[command(name = "toolgate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Hide download progress
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fail unless the Go toolchain satisfies a semver constraint
    GoVersion(GoVersionArgs),

    /// Install mage with `go install`
    Mage,

    /// Install the GitHub CLI
    Gh,

    /// Install kind
    Kind(KindArgs),

    /// Install the latest porter
    Porter,

    /// Install mage, gh, kind and porter
    All,
}

/// Arguments for the `go-version` command.
#[derive(Debug, clap::Args)]
pub struct GoVersionArgs {
    /// Constraint such as ">=1.16" or "^1.20 || ~1.19"
    pub constraint: String,

    /// Check this version instead of asking the toolchain
    #[arg(long, value_name = "VERSION")]
    pub toolchain_version: Option<String>,
}

/// Arguments for the `kind` command.
#[derive(Debug, clap::Args)]
pub struct KindArgs {
    /// kind release to install
    #[arg(long, env = "KIND_VERSION")]
    pub version: Option<String>,
}
