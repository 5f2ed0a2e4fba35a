//! Content fingerprint of a subproject output tree
//!
//! Each candidate file is hashed with SHA-1 after rewriting CRLF to LF. The
//! lowercase hex digests are sorted and fed, in that order, into one more
//! SHA-1 whose hex digest is the directory hash.
//!
//! Only the multiset of file digests is fingerprinted, not which path holds
//! which content: swapping the contents of two files leaves the hash
//! unchanged.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use sha1::{Digest, Sha1};
use walkdir::WalkDir;

use super::descriptor::descriptor_path;
use crate::error::SubprojectError;

/// File name suffixes never included in a fingerprint
pub const EXCLUDED_SUFFIXES: [&str; 2] = [".log", ".cache"];

const READ_CHUNK: usize = 64 * 1024;

/// Whether a file name is part of the fingerprint
pub fn is_candidate(file_name: &str) -> bool {
    !EXCLUDED_SUFFIXES
        .iter()
        .any(|suffix| file_name.ends_with(suffix))
}

/// Files hashed for `output_dir`, in walk order
///
/// Directories are visited in name order. When the output tree is separate
/// from the working directory, project.xml is added first so descriptor
/// changes still invalidate the cache.
pub fn candidate_files(working_dir: &Path, output_dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if output_dir != working_dir {
        files.push(descriptor_path(working_dir));
    }

    for entry in WalkDir::new(output_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        // Anything that is not a directory is hashed, so a dangling
        // symlink fails in hash_file instead of vanishing from the tree.
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        if is_candidate(&entry.file_name().to_string_lossy()) {
            files.push(path.to_path_buf());
        }
    }

    files
}

/// Rewrites CRLF to LF across a stream of chunks
///
/// A CR at the end of one chunk is held back until the next byte is known.
#[derive(Debug, Default)]
pub struct LineEndingNormalizer {
    pending_cr: bool,
}

impl LineEndingNormalizer {
    pub fn push(&mut self, chunk: &[u8], out: &mut Vec<u8>) {
        for &byte in chunk {
            if self.pending_cr && byte != b'\n' {
                out.push(b'\r');
            }
            self.pending_cr = byte == b'\r';
            if !self.pending_cr {
                out.push(byte);
            }
        }
    }

    pub fn finish(self, out: &mut Vec<u8>) {
        if self.pending_cr {
            out.push(b'\r');
        }
    }
}

/// Rewrite every CRLF in `content` to LF
pub fn normalize_line_endings(content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len());
    let mut normalizer = LineEndingNormalizer::default();
    normalizer.push(content, &mut out);
    normalizer.finish(&mut out);
    out
}

/// SHA-1 of a file's content with CRLF rewritten to LF, as lowercase hex
pub fn hash_file(path: &Path) -> Result<String, SubprojectError> {
    let mut file = File::open(path).map_err(|e| SubprojectError::io(path, e))?;
    let mut hasher = Sha1::new();
    let mut normalizer = LineEndingNormalizer::default();
    let mut buf = vec![0u8; READ_CHUNK];
    let mut normalized = Vec::with_capacity(READ_CHUNK);

    loop {
        let read = match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(SubprojectError::io(path, e)),
        };
        normalized.clear();
        normalizer.push(&buf[..read], &mut normalized);
        hasher.update(&normalized);
    }

    normalized.clear();
    normalizer.finish(&mut normalized);
    hasher.update(&normalized);

    Ok(format!("{:x}", hasher.finalize()))
}

/// Combine per-file digests into the directory hash
pub fn combine_digests(mut digests: Vec<String>) -> String {
    digests.sort();

    let mut hasher = Sha1::new();
    for digest in &digests {
        hasher.update(digest.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Directory hash of a subproject's output tree
pub fn hash_directory(working_dir: &Path, output_dir: &Path) -> Result<String, SubprojectError> {
    let digests = candidate_files(working_dir, output_dir)
        .par_iter()
        .map(|path| hash_file(path))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(combine_digests(digests))
}
