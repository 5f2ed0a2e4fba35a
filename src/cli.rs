//! CLI argument parsing using clap derive macros

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{
    args::ArgsCommand, fingerprint::FingerprintCommand, subproject::SubprojectCommand,
};

/// taproot-build - Taproot build orchestration helpers
///
/// Regenerates lbuild subprojects only when their inputs changed, and
/// validates build target selection for SCons invocations.
#[derive(Parser, Debug)]
#[command(name = "taproot-build")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run lbuild for a subproject if its inputs changed
    Subproject(SubprojectCommand),

    /// Print the content fingerprint of a subproject's output tree
    Fingerprint(FingerprintCommand),

    /// Validate SCons-style build target and options
    Args(ArgsCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        if self.no_color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }

        match self.command {
            Commands::Subproject(cmd) => cmd.execute(self.verbose),
            Commands::Fingerprint(cmd) => cmd.execute(self.verbose),
            Commands::Args(cmd) => cmd.execute(self.verbose),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_args_accepts_key_value_tokens() {
        let cli = Cli::try_parse_from(["taproot-build", "args", "run", "profile=fast"]).unwrap();
        match cli.command {
            Commands::Args(cmd) => assert_eq!(cmd.tokens, vec!["run", "profile=fast"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_args_tokens() {
        let cli = Cli::try_parse_from(["taproot-build", "args", "run", "--json", "--no-color"]).unwrap();
        assert!(cli.no_color);
        match cli.command {
            Commands::Args(cmd) => {
                assert!(cmd.json);
                assert_eq!(cmd.tokens, vec!["run"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_subproject_output_defaults_to_none() {
        let cli = Cli::try_parse_from(["taproot-build", "subproject", "modm", "taproot"]).unwrap();
        match cli.command {
            Commands::Subproject(cmd) => {
                assert_eq!(cmd.name, "modm");
                assert!(cmd.output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
