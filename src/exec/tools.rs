//! External tools driven by the subproject cache builder

use std::path::Path;

use crate::config::ToolConfig;
use crate::error::{hints, SubprojectError};
use crate::exec::subprocess::{command_exists, run_command};

/// The version-control and generator boundary of a subproject build
pub trait ExternalTools {
    /// Abbreviated, always non-empty revision of the repository at `repo_dir`
    fn describe_revision(&self, repo_dir: &Path) -> Result<String, SubprojectError>;

    /// Run the code generator with `working_dir` as its working directory
    fn run_generator(&self, working_dir: &Path) -> Result<(), SubprojectError>;
}

/// Tools resolved from the system PATH (or configured explicitly)
#[derive(Debug, Clone)]
pub struct SystemTools {
    config: ToolConfig,
    verbose: bool,
}

impl SystemTools {
    pub fn new(config: ToolConfig, verbose: bool) -> Self {
        Self { config, verbose }
    }
}

impl ExternalTools for SystemTools {
    fn describe_revision(&self, repo_dir: &Path) -> Result<String, SubprojectError> {
        let version_control = |message: String| SubprojectError::VersionControl {
            repo: repo_dir.to_path_buf(),
            message,
        };

        let result = run_command(
            &self.config.git,
            &["describe", "--always", "--abbrev=7"],
            repo_dir,
            false,
        )
        .map_err(|e| version_control(format!("{:#}", e)))?;

        if !result.success {
            return Err(version_control(format!(
                "exit code {}: {}",
                result.exit_code,
                result.stderr.trim()
            )));
        }

        let revision = result.stdout.trim().to_string();
        if revision.is_empty() {
            return Err(version_control("git describe printed nothing".to_string()));
        }
        Ok(revision)
    }

    fn run_generator(&self, working_dir: &Path) -> Result<(), SubprojectError> {
        let program = &self.config.generator;
        let generator = |message: String, hint: Option<String>| SubprojectError::Generator {
            program: program.clone(),
            working_dir: working_dir.to_path_buf(),
            message,
            hint,
        };

        let result = run_command(program, &["build"], working_dir, true).map_err(|e| {
            let hint = (!command_exists(program)).then(|| hints::lbuild().to_string());
            generator(format!("{:#}", e), hint)
        })?;

        if !result.success {
            return Err(generator(format!("exit code {}", result.exit_code), None));
        }

        if self.verbose {
            crate::utils::terminal::print_info(&format!(
                "{} build finished in {:.1}s",
                program,
                result.duration.as_secs_f64()
            ));
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn tools(generator: &str, git: &str) -> SystemTools {
        SystemTools::new(ToolConfig::from_options(Some(generator.into()), Some(git.into()), false), false)
    }

    #[test]
    fn test_describe_outside_repository_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = tools("lbuild", "definitely-not-git-42")
            .describe_revision(dir.path())
            .unwrap_err();
        assert!(matches!(err, SubprojectError::VersionControl { .. }));
    }

    #[test]
    fn test_generator_exit_code_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = tools("false", "git").run_generator(dir.path()).unwrap_err();
        assert!(matches!(err, SubprojectError::Generator { .. }));
    }

    #[test]
    fn test_missing_generator_carries_install_hint() {
        let dir = tempfile::tempdir().unwrap();
        let err = tools("definitely-not-lbuild-42", "git")
            .run_generator(dir.path())
            .unwrap_err();
        assert_eq!(err.hint(), Some(hints::lbuild()));
    }
}
