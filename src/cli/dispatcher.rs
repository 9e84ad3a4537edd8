//! Command dispatching.
//!
//! Routes each [`Commands`] variant to its library operation and reports
//! what happened through `tracing`.

use std::path::PathBuf;

use crate::cli::args::{Cli, Commands, GoVersionArgs};
use crate::config::ToolsConfig;
use crate::error::Result;
use crate::goversion::{check_go_version, enforce_go_version};
use crate::tools::{ensure_github_client, ensure_kind, ensure_mage, ensure_porter};

/// Dispatches CLI commands to the installers and the Go version gate.
pub struct CommandDispatcher {
    config: ToolsConfig,
}

impl CommandDispatcher {
    /// Create a dispatcher around a resolved configuration.
    pub fn new(config: ToolsConfig) -> Self {
        Self { config }
    }

    /// Build the configuration from the environment and the global flags.
    pub fn from_cli(cli: &Cli) -> Self {
        let mut config = ToolsConfig::from_env();
        if cli.quiet {
            config.show_progress = false;
        }
        if let Commands::Kind(args) = &cli.command {
            if let Some(version) = &args.version {
                config.kind_version = version.clone();
            }
        }
        Self::new(config)
    }

    /// The configuration commands run against.
    pub fn config(&self) -> &ToolsConfig {
        &self.config
    }

    /// Run the command selected on the command line.
    pub fn dispatch(&self, command: &Commands) -> Result<()> {
        match command {
            Commands::GoVersion(args) => self.go_version(args),
            Commands::Mage => self.mage(),
            Commands::Gh => self.gh(),
            Commands::Kind(_) => self.kind(),
            Commands::Porter => self.porter(),
            Commands::All => {
                self.mage()?;
                self.gh()?;
                self.kind()?;
                self.porter()
            }
        }
    }

    fn go_version(&self, args: &GoVersionArgs) -> Result<()> {
        let version = match &args.toolchain_version {
            Some(reported) => check_go_version(reported, &args.constraint)?,
            None => enforce_go_version(&self.config, &args.constraint)?,
        };
        tracing::info!("go {} satisfies {}", version, args.constraint);
        Ok(())
    }

    fn mage(&self) -> Result<()> {
        report("mage", ensure_mage(&self.config)?);
        Ok(())
    }

    fn gh(&self) -> Result<()> {
        report("gh", ensure_github_client(&self.config)?);
        Ok(())
    }

    fn kind(&self) -> Result<()> {
        report("kind", ensure_kind(&self.config)?);
        Ok(())
    }

    fn porter(&self) -> Result<()> {
        report("porter", Some(ensure_porter(&self.config)?));
        Ok(())
    }
}

fn report(tool: &str, installed: Option<PathBuf>) {
    match installed {
        Some(path) => tracing::info!("{} installed at {}", tool, path.display()),
        None => tracing::info!("{} is already installed", tool),
    }
}
