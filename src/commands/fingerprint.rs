//! Fingerprint command implementation

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::subproject::fingerprint::candidate_files;
use crate::subproject::Subproject;
use crate::utils::terminal;

/// Print the content fingerprint of a subproject's output tree
#[derive(Args, Debug)]
pub struct FingerprintCommand {
    /// Directory containing project.xml
    pub working_dir: PathBuf,

    /// Generated tree to fingerprint (defaults to the working directory)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl FingerprintCommand {
    /// Execute the fingerprint command
    pub fn execute(self, verbose: bool) -> Result<()> {
        let subproject = Subproject::new("", self.working_dir, self.output);

        if !subproject.output_dir.is_dir() {
            terminal::print_warning(&format!(
                "{} is not a directory; fingerprinting an empty tree",
                subproject.output_dir.display()
            ));
        }

        if verbose {
            for file in candidate_files(&subproject.working_dir, &subproject.output_dir) {
                terminal::print_info(&file.display().to_string());
            }
        }

        println!("{}", subproject.directory_hash()?);
        Ok(())
    }
}
