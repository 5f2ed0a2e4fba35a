//! Cached lbuild subproject generation
//!
//! A subproject is regenerated only when the upstream repository revision
//! or the content of its output tree changed since the last successful
//! build. Both are recorded in a `.cache` marker file inside the working
//! directory as `<git-sha> <directory-hash>`.

pub mod descriptor;
pub mod fingerprint;
pub mod overrides;

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::config::ToolConfig;
use crate::error::SubprojectError;
use crate::exec::ExternalTools;
use crate::utils::terminal;

/// Marker file holding the last successful fingerprint
pub const MARKER_FILE: &str = ".cache";

/// Read limit for project.xml and the marker file
const HEAD_LIMIT: u64 = 64 * 1024;

/// Read at most the first 64 KiB of a UTF-8 text file.
///
/// A multi-byte character cut off by the read limit is dropped; any other
/// invalid UTF-8 is an `InvalidData` error.
pub(crate) fn read_text_head(path: &Path) -> io::Result<String> {
    let mut bytes = Vec::new();
    File::open(path)?.take(HEAD_LIMIT).read_to_end(&mut bytes)?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            let utf8 = err.utf8_error();
            let truncated = utf8.error_len().is_none() && err.as_bytes().len() as u64 == HEAD_LIMIT;
            if !truncated {
                return Err(io::Error::new(io::ErrorKind::InvalidData, utf8));
            }
            let mut bytes = err.into_bytes();
            bytes.truncate(utf8.valid_up_to());
            String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
        }
    }
}

/// An lbuild subproject
#[derive(Debug, Clone)]
pub struct Subproject {
    pub name: String,
    /// Directory containing project.xml, where lbuild runs
    pub working_dir: PathBuf,
    /// Generated tree that is fingerprinted
    pub output_dir: PathBuf,
}

impl Subproject {
    /// Create a subproject; the output directory defaults to the working directory
    pub fn new(name: impl Into<String>, working_dir: impl Into<PathBuf>, output_dir: Option<PathBuf>) -> Self {
        let working_dir = working_dir.into();
        let output_dir = output_dir.unwrap_or_else(|| working_dir.clone());
        Self {
            name: name.into(),
            working_dir,
            output_dir,
        }
    }

    pub fn marker_path(&self) -> PathBuf {
        self.working_dir.join(MARKER_FILE)
    }

    /// Content fingerprint of the output tree
    pub fn directory_hash(&self) -> Result<String, SubprojectError> {
        fingerprint::hash_directory(&self.working_dir, &self.output_dir)
    }
}

/// Contents of the `.cache` marker file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintRecord {
    pub git_sha: String,
    pub directory_hash: String,
}

impl FingerprintRecord {
    pub fn new(git_sha: impl Into<String>, directory_hash: impl Into<String>) -> Self {
        Self {
            git_sha: git_sha.into(),
            directory_hash: directory_hash.into(),
        }
    }

    /// Load the stored record text, trimmed; `None` if there is no marker
    pub fn load(path: &Path) -> Result<Option<String>, SubprojectError> {
        if !path.exists() {
            return Ok(None);
        }
        let text = read_text_head(path).map_err(|e| SubprojectError::io(path, e))?;
        Ok(Some(text.trim().to_string()))
    }

    /// Whether a stored marker matches this record exactly
    pub fn matches(&self, stored: &str) -> bool {
        stored == self.to_string()
    }

    /// Overwrite the marker file with this record
    pub fn save(&self, path: &Path) -> Result<(), SubprojectError> {
        std::fs::write(path, self.to_string()).map_err(|e| SubprojectError::io(path, e))
    }
}

impl fmt::Display for FingerprintRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.git_sha, self.directory_hash)
    }
}

/// What a subproject build did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The stored fingerprint matched; lbuild was not run
    CacheHit,
    /// lbuild ran and a new fingerprint was stored
    Generated { record: FingerprintRecord },
}

fn apply_overrides(subproject: &Subproject, config: &ToolConfig, verbose: bool) -> Result<(), SubprojectError> {
    if !config.windows_overrides {
        return Ok(());
    }
    let touched = overrides::apply_windows_overrides(&subproject.working_dir)?;
    if verbose {
        for path in touched {
            terminal::print_info(&format!("normalized {}", path.display()));
        }
    }
    Ok(())
}

/// Run the generator for `subproject` unless its fingerprint is unchanged
pub fn build_subproject(
    subproject: &Subproject,
    tools: &dyn ExternalTools,
    config: &ToolConfig,
    verbose: bool,
) -> Result<BuildOutcome, SubprojectError> {
    apply_overrides(subproject, config, verbose)?;

    let repo_dir = subproject
        .working_dir
        .join(descriptor::upstream_repo_dir(&subproject.working_dir)?);
    let git_sha = tools.describe_revision(&repo_dir)?;
    let directory_hash = subproject.directory_hash()?;

    let marker = subproject.marker_path();
    let current = FingerprintRecord::new(git_sha.clone(), directory_hash);
    if verbose {
        terminal::print_info(&format!("{} fingerprint: {}", subproject.name, current));
    }

    if let Some(stored) = FingerprintRecord::load(&marker)? {
        if current.matches(&stored) {
            return Ok(BuildOutcome::CacheHit);
        }
    }

    tools.run_generator(&subproject.working_dir)?;

    apply_overrides(subproject, config, verbose)?;

    let record = FingerprintRecord::new(git_sha, subproject.directory_hash()?);
    record.save(&marker)?;

    Ok(BuildOutcome::Generated { record })
}
