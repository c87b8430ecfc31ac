//! Output path resolution under a project root.
//!
//! Segments are relative path fragments such as `target/classes/webroot`.
//! Each `/`-separated component is checked on its own, so a valid segment
//! can never climb out of the root or name a reserved file.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::root::ProjectRoot;
use crate::resolver::errors::ResolveError;

/// Characters rejected in any path component on any platform.
const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*', '\\'];

/// Device names Windows refuses as file names, with or without extension.
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Why a path segment was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathFault {
    #[error("segment or one of its components is empty")]
    Empty,

    #[error("`.` components are not allowed")]
    CurrentDir,

    #[error("`..` would escape the project root")]
    ParentTraversal,

    #[error("absolute paths are not allowed")]
    Absolute,

    #[error("reserved character {0:?}")]
    ReservedChar(char),

    #[error("reserved device name")]
    ReservedName,

    #[error("must be a single path component")]
    Nested,

    #[error("resolves outside the project root through a symlink")]
    SymlinkEscape,
}

/// Check one path component (no separators).
pub fn check_component(component: &str) -> Result<(), PathFault> {
    match component {
        "" => return Err(PathFault::Empty),
        "." => return Err(PathFault::CurrentDir),
        ".." => return Err(PathFault::ParentTraversal),
        _ => {}
    }

    if let Some(c) = component
        .chars()
        .find(|c| c.is_control() || RESERVED_CHARS.contains(c))
    {
        return Err(PathFault::ReservedChar(c));
    }

    let stem = component.split('.').next().unwrap_or(component);
    if RESERVED_NAMES
        .iter()
        .any(|name| name.eq_ignore_ascii_case(stem))
    {
        return Err(PathFault::ReservedName);
    }

    Ok(())
}

/// Split a segment into validated components.
pub fn segment_components(segment: &str) -> Result<Vec<&str>, ResolveError> {
    let fail = |fault| ResolveError::InvalidPathSegment {
        segment: segment.to_string(),
        fault,
    };

    if segment.is_empty() {
        return Err(fail(PathFault::Empty));
    }
    if segment.starts_with('/') || has_drive_prefix(segment) {
        return Err(fail(PathFault::Absolute));
    }

    segment
        .split('/')
        .map(|component| check_component(component).map(|()| component).map_err(fail))
        .collect()
}

/// Validate a file name: exactly one component.
pub fn check_file_name(name: &str) -> Result<(), ResolveError> {
    let components = segment_components(name)?;
    if components.len() != 1 {
        return Err(ResolveError::InvalidPathSegment {
            segment: name.to_string(),
            fault: PathFault::Nested,
        });
    }
    Ok(())
}

fn has_drive_prefix(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Join `segments` under `root`.
///
/// The result is absolute because the root is, is a descendant of the root
/// because no component may be `..` or absolute, and depends on nothing but
/// the inputs.
pub fn resolve_output_path<I, S>(root: &ProjectRoot, segments: I) -> Result<PathBuf, ResolveError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut path = root.as_path().to_path_buf();
    for segment in segments {
        for component in segment_components(segment.as_ref())? {
            path.push(component);
        }
    }

    debug_assert!(root.contains(&path));
    Ok(path)
}
