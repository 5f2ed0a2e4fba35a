//! Subproject command implementation

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::config::ToolConfig;
use crate::exec::SystemTools;
use crate::subproject::{build_subproject, BuildOutcome, Subproject};
use crate::utils::terminal;

/// Run lbuild for a subproject if its inputs changed
#[derive(Args, Debug)]
pub struct SubprojectCommand {
    /// Subproject name, used in progress output
    pub name: String,

    /// Directory containing project.xml
    pub working_dir: PathBuf,

    /// Generated tree to fingerprint (defaults to the working directory)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// lbuild executable
    #[arg(long, env = "TAPROOT_LBUILD")]
    pub lbuild: Option<String>,

    /// git executable
    #[arg(long, env = "TAPROOT_GIT")]
    pub git: Option<String>,

    /// Apply the Windows path and line-ending rewrites on any platform
    #[arg(long)]
    pub windows_overrides: bool,
}

impl SubprojectCommand {
    /// Execute the subproject command
    pub fn execute(self, verbose: bool) -> Result<()> {
        let config = ToolConfig::from_options(self.lbuild, self.git, self.windows_overrides);
        let tools = SystemTools::new(config.clone(), verbose);
        let subproject = Subproject::new(self.name, self.working_dir, self.output);

        terminal::print_step("building", &subproject.name);

        match build_subproject(&subproject, &tools, &config, verbose)? {
            BuildOutcome::CacheHit => {
                if verbose {
                    terminal::print_info(&format!("{} is up to date", subproject.name));
                }
            }
            BuildOutcome::Generated { record } => {
                if verbose {
                    terminal::print_success(&format!(
                        "{} generated, fingerprint {}",
                        subproject.name, record
                    ));
                }
            }
        }
        Ok(())
    }
}
