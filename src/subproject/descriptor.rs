//! project.xml discovery
//!
//! lbuild subprojects declare their upstream repository in project.xml as
//! `<path>../modm/repo.lb</path>`; the directory part of that path is the
//! git checkout whose revision participates in the fingerprint.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use super::read_text_head;
use crate::error::SubprojectError;

/// Descriptor file name inside a subproject's working directory
pub const DESCRIPTOR_FILE: &str = "project.xml";

const REPO_PATH_PATTERN: &str = r"<path>(.*)(/|\\)repo\.lb</path>";

fn repo_path_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(REPO_PATH_PATTERN).expect("repo.lb pattern is valid"))
}

/// Path of the descriptor for a working directory
pub fn descriptor_path(working_dir: &Path) -> PathBuf {
    working_dir.join(DESCRIPTOR_FILE)
}

/// Extract the repository directory preceding `/repo.lb` or `\repo.lb`
pub fn find_repo_path(text: &str) -> Option<&str> {
    repo_path_regex()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Read project.xml and return the upstream repository path, relative to `working_dir`
pub fn upstream_repo_dir(working_dir: &Path) -> Result<PathBuf, SubprojectError> {
    let path = descriptor_path(working_dir);
    let text = read_text_head(&path).map_err(|e| SubprojectError::UnreadableDescriptor {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    match find_repo_path(text.trim()) {
        Some(repo) => Ok(PathBuf::from(repo)),
        None => Err(SubprojectError::DescriptorPattern { path }),
    }
}
