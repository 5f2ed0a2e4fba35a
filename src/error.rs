//! Error types and helpers for user-friendly error messages
//!
//! Every error here is fatal: it is reported once by [`report`] and the
//! process exits with a non-zero status.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::build_args::USAGE;
use crate::utils::terminal;

/// Failures while building an lbuild subproject
#[derive(Error, Debug)]
pub enum SubprojectError {
    /// project.xml is missing or cannot be decoded
    #[error("Cannot read project descriptor {}: {reason}", path.display())]
    UnreadableDescriptor { path: PathBuf, reason: String },

    /// project.xml does not reference a repo.lb file
    #[error("No <path>.../repo.lb</path> entry found in {}", path.display())]
    DescriptorPattern { path: PathBuf },

    /// `git describe` failed for the upstream repository
    #[error("Failed to describe git revision in {}: {message}", repo.display())]
    VersionControl { repo: PathBuf, message: String },

    /// The generator tool could not be launched or exited non-zero
    #[error("{program} build failed in {}: {message}", working_dir.display())]
    Generator {
        program: String,
        working_dir: PathBuf,
        message: String,
        hint: Option<String>,
    },

    /// Reading or writing a file inside the subproject failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SubprojectError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            SubprojectError::UnreadableDescriptor { .. } => Some(hints::project_xml()),
            SubprojectError::DescriptorPattern { .. } => Some(hints::repo_lb()),
            SubprojectError::VersionControl { .. } => Some(hints::git()),
            SubprojectError::Generator { hint, .. } => hint.as_deref(),
            SubprojectError::Io { .. } => None,
        }
    }

    /// Display error with formatting and hints
    pub fn display_with_hints(&self) {
        use console::style;

        eprintln!("\n{} {}", style("ERROR:").red().bold(), self);
        if let Some(hint) = self.hint() {
            eprintln!("\n{} {}", style("HINT:").yellow().bold(), hint);
        }
        eprintln!();
    }
}

/// Invalid SCons build arguments; every message carries the usage text
#[derive(Error, Debug)]
pub enum ArgsError {
    #[error("You did not enter the correct number of arguments.\n{}", USAGE)]
    TooManyTargets,

    #[error("You must select a valid robot target.\n{}", USAGE)]
    MissingTarget,

    #[error("You did not select a valid target: \"{target}\".\n{}", USAGE)]
    InvalidTarget { target: String },

    #[error("You specified an invalid build profile: \"{profile}\".\n{}", USAGE)]
    InvalidProfile { profile: String },

    #[error("You specified an invalid profiling type: \"{value}\".\n{}", USAGE)]
    InvalidProfiling { value: String },
}

/// Top-level error reporter used by `main`
pub fn report(err: &anyhow::Error) {
    if let Some(err) = err.downcast_ref::<SubprojectError>() {
        err.display_with_hints();
    } else if let Some(err) = err.downcast_ref::<ArgsError>() {
        eprintln!("{}", err);
    } else {
        terminal::print_error(&format!("{:#}", err));
    }
}

/// Common error hints
pub mod hints {
    /// Get hint for missing Git
    pub fn git() -> &'static str {
        "Make sure the upstream repository referenced by project.xml is a git checkout:\n\
         • Run: git submodule update --init --recursive\n\
         • Install Git from https://git-scm.com/ if it is missing"
    }

    /// Get hint for missing lbuild
    pub fn lbuild() -> &'static str {
        "Install lbuild with pip:\n\
         • Run: pip install lbuild\n\
         • Or pass --lbuild / set TAPROOT_LBUILD to the lbuild executable"
    }

    pub fn project_xml() -> &'static str {
        "Every lbuild subproject needs a project.xml in its working directory."
    }

    pub fn repo_lb() -> &'static str {
        "project.xml must contain an entry like <repository><path>../modm/repo.lb</path></repository>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_errors_end_with_usage() {
        let errors = [
            ArgsError::TooManyTargets,
            ArgsError::MissingTarget,
            ArgsError::InvalidTarget {
                target: "bogus".into(),
            },
            ArgsError::InvalidProfile {
                profile: "turbo".into(),
            },
            ArgsError::InvalidProfiling {
                value: "maybe".into(),
            },
        ];
        for err in errors {
            assert!(err.to_string().ends_with(USAGE), "{:?}", err);
        }
    }

    #[test]
    fn test_too_many_targets_wording() {
        assert_eq!(
            ArgsError::TooManyTargets.to_string(),
            format!("You did not enter the correct number of arguments.\n{}", USAGE)
        );
    }

    #[test]
    fn test_generator_hint_is_optional() {
        let err = SubprojectError::Generator {
            program: "lbuild".into(),
            working_dir: PathBuf::from("taproot"),
            message: "exit code 1".into(),
            hint: None,
        };
        assert!(err.hint().is_none());
        assert_eq!(err.to_string(), "lbuild build failed in taproot: exit code 1");
    }

    #[test]
    fn test_subproject_error_survives_anyhow() {
        let err: anyhow::Error = SubprojectError::DescriptorPattern {
            path: PathBuf::from("project.xml"),
        }
        .into();
        assert!(err.downcast_ref::<SubprojectError>().is_some());
    }
}
