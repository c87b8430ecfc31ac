//! Resolution error types and diagnostics.

use std::path::PathBuf;

use thiserror::Error;

use crate::resolver::paths::PathFault;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error while turning configuration into a build plan.
///
/// Every variant aborts the whole resolution; nothing is retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("invalid path segment `{segment}`: {fault}")]
    InvalidPathSegment { segment: String, fault: PathFault },

    #[error("invalid target `{name}`: {reason}")]
    InvalidTarget { name: String, reason: String },

    #[error("no file matches `{pattern}` for target `{target}`")]
    MissingSource { target: String, pattern: String },

    #[error("invalid project root `{}`: {reason}", .path.display())]
    InvalidRoot { path: PathBuf, reason: String },
}

impl ResolveError {
    pub(crate) fn invalid_target(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ResolveError::InvalidTarget {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::InvalidPathSegment { segment, fault } => {
                let diag = Diagnostic::error(format!("invalid path segment `{}`", segment))
                    .with_context(fault.to_string());

                match fault {
                    PathFault::ParentTraversal | PathFault::Absolute => diag.with_suggestion(
                        "Output paths must stay inside the project root; use a relative path",
                    ),
                    PathFault::ReservedChar(_) | PathFault::ReservedName => diag
                        .with_suggestion("Rename it using letters, digits, `-`, `_` and `.`"),
                    PathFault::Empty | PathFault::CurrentDir => {
                        diag.with_suggestion("Remove the empty or `.` component")
                    }
                    PathFault::Nested => diag.with_suggestion(
                        "Put directories in `output.dir`; `filename` is a bare file name",
                    ),
                    PathFault::SymlinkEscape => diag.with_suggestion(
                        "Remove the symlink or point it at a directory inside the project root",
                    ),
                }
            }

            ResolveError::InvalidTarget { name, reason } => {
                let title = if name.is_empty() {
                    "invalid target".to_string()
                } else {
                    format!("invalid target `{}`", name)
                };
                Diagnostic::error(title)
                    .with_context(reason.clone())
                    .with_suggestion("Fix the [[target]] entry in Wharf.toml")
            }

            ResolveError::MissingSource { target, pattern } => Diagnostic::error(format!(
                "no file matches `{}`",
                pattern
            ))
            .with_context(format!("required by target `{}`", target))
            .with_suggestion(suggestions::MISSING_SOURCE)
            .with_suggestion(
                "Set `source-check = \"deferred\"` under [resolve] to check at build time",
            ),

            ResolveError::InvalidRoot { path, reason } => {
                Diagnostic::error(format!("invalid project root `{}`", path.display()))
                    .with_context(reason.clone())
            }
        }
    }
}
