//! Windows override pass
//!
//! lbuild run on Windows writes a few generated files with backslash paths
//! or CRLF endings, while the repository stores them with forward slashes
//! and LF. These rewrites bring them back to the canonical form.

use std::fs;
use std::path::{Path, PathBuf};

use super::fingerprint::normalize_line_endings;
use crate::error::SubprojectError;

/// Files rewritten from CRLF to LF
pub const CRLF_TO_LF: [&str; 1] = ["modm/ext/gcc/cabi.c"];

/// Files where every `\\` pair becomes `/`
pub const DOUBLE_BACKSLASHES_TO_FORWARD_SLASHES: [&str; 1] = ["modm/openocd.cfg"];

/// Files where every `\` becomes `/`
pub const BACKSLASHES_TO_FORWARD_SLASHES: [&str; 3] = [
    "project.xml",
    "modm/SConscript",
    "modm/ext/printf/printf.h",
];

/// Replace each `\\` pair with `/`; a trailing lone backslash is kept
pub fn collapse_double_backslashes(content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len());
    let mut i = 0;
    while i < content.len() {
        if content[i] == b'\\' && content.get(i + 1) == Some(&b'\\') {
            out.push(b'/');
            i += 2;
        } else {
            out.push(content[i]);
            i += 1;
        }
    }
    out
}

/// Replace every `\` with `/`
pub fn forward_slashes(content: &[u8]) -> Vec<u8> {
    content
        .iter()
        .map(|&byte| if byte == b'\\' { b'/' } else { byte })
        .collect()
}

/// Rewrite `working_dir/relative` in place; missing files are skipped.
///
/// Returns whether the file was present.
fn rewrite(
    working_dir: &Path,
    relative: &str,
    transform: fn(&[u8]) -> Vec<u8>,
) -> Result<bool, SubprojectError> {
    let path = working_dir.join(relative);
    if !path.is_file() {
        return Ok(false);
    }

    let content = fs::read(&path).map_err(|e| SubprojectError::io(&path, e))?;
    let rewritten = transform(&content);
    if rewritten != content {
        fs::write(&path, rewritten).map_err(|e| SubprojectError::io(&path, e))?;
    }
    Ok(true)
}

/// Apply every Windows rewrite under `working_dir`, returning the files touched
pub fn apply_windows_overrides(working_dir: &Path) -> Result<Vec<PathBuf>, SubprojectError> {
    let passes: [(&[&str], fn(&[u8]) -> Vec<u8>); 3] = [
        (&CRLF_TO_LF, normalize_line_endings),
        (
            &DOUBLE_BACKSLASHES_TO_FORWARD_SLASHES,
            collapse_double_backslashes,
        ),
        (&BACKSLASHES_TO_FORWARD_SLASHES, forward_slashes),
    ];

    let mut present = Vec::new();
    for (files, transform) in passes {
        for relative in files {
            if rewrite(working_dir, relative, transform)? {
                present.push(working_dir.join(relative));
            }
        }
    }
    Ok(present)
}
