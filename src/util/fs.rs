//! Filesystem utilities.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use glob::{glob_with, MatchOptions, Pattern};

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Canonicalize the longest existing prefix of `path` and append the rest.
///
/// Symlinks along the existing part are followed. A dangling symlink is an
/// error, since its target cannot be checked.
pub fn canonicalize_existing(path: &Path) -> io::Result<PathBuf> {
    let mut existing = path;
    let mut rest = Vec::new();
    loop {
        match existing.canonicalize() {
            Ok(real) => return Ok(rest.iter().rev().fold(real, |acc, c| acc.join(c))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if existing.symlink_metadata().is_ok() {
                    return Err(e);
                }
                match (existing.parent(), existing.file_name()) {
                    (Some(parent), Some(name)) => {
                        rest.push(name.to_os_string());
                        existing = parent;
                    }
                    _ => return Err(e),
                }
            }
            Err(e) => return Err(e),
        }
    }
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write file: {}", path.display()))
}

/// Check that `pattern` is a syntactically valid glob.
pub fn check_pattern(pattern: &str) -> std::result::Result<(), String> {
    Pattern::new(pattern).map(|_| ()).map_err(|e| e.to_string())
}

/// Find files matching a glob pattern relative to a base directory.
///
/// Only regular files are returned, sorted and deduplicated so that the same
/// tree always yields the same list.
pub fn glob_files(base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    // The base is a literal path; only `pattern` may contain glob syntax.
    let pattern_str = format!("{}/{}", Pattern::escape(&base.to_string_lossy()), pattern);

    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let mut results = Vec::new();
    for entry in glob_with(&pattern_str, options)
        .with_context(|| format!("invalid glob pattern: {}", pattern))?
    {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    results.push(path);
                }
            }
            Err(e) => {
                tracing::warn!("glob error: {}", e);
            }
        }
    }

    results.sort();
    results.dedup();
    Ok(results)
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Check if a path is inside another path.
pub fn is_inside(path: &Path, parent: &Path) -> bool {
    path.starts_with(parent)
}

/// True if the relative path walks upward at any point.
pub fn has_parent_component(path: &Path) -> bool {
    path.components().any(|c| matches!(c, Component::ParentDir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_glob_files() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::write(src.join("b.coffee"), "b = 2").unwrap();
        fs::write(src.join("a.coffee"), "a = 1").unwrap();
        fs::write(src.join("nested/c.coffee"), "c = 3").unwrap();
        fs::write(src.join("readme.txt"), "readme").unwrap();

        let files = glob_files(tmp.path(), "src/*.coffee").unwrap();
        assert_eq!(files, vec![src.join("a.coffee"), src.join("b.coffee")]);

        let all = glob_files(tmp.path(), "src/**/*.coffee").unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_glob_skips_directories_and_hidden_files() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("dir")).unwrap();
        fs::write(src.join(".hidden"), "").unwrap();
        fs::write(src.join("index.js"), "").unwrap();

        let files = glob_files(tmp.path(), "src/*").unwrap();
        assert_eq!(files, vec![src.join("index.js")]);
    }

    #[test]
    fn test_canonicalize_existing_keeps_missing_tail() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("dist")).unwrap();
        let real = canonicalize_existing(&tmp.path().join("dist/web/app.js")).unwrap();
        assert_eq!(real, tmp.path().canonicalize().unwrap().join("dist/web/app.js"));
    }

    #[cfg(unix)]
    #[test]
    fn test_canonicalize_existing_follows_symlinks() {
        let tmp = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        std::os::unix::fs::symlink(elsewhere.path(), tmp.path().join("target")).unwrap();

        let real = canonicalize_existing(&tmp.path().join("target/classes")).unwrap();
        assert_eq!(real, elsewhere.path().canonicalize().unwrap().join("classes"));

        std::os::unix::fs::symlink(tmp.path().join("gone"), tmp.path().join("dangling")).unwrap();
        assert!(canonicalize_existing(&tmp.path().join("dangling/x")).is_err());
    }

    #[test]
    fn test_glob_base_is_literal() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("site[v2]");
        fs::create_dir_all(base.join("src")).unwrap();
        fs::write(base.join("src/index.js"), "").unwrap();
        // Would match if the base were read as a pattern.
        fs::create_dir_all(tmp.path().join("sitev/src")).unwrap();
        fs::write(tmp.path().join("sitev/src/other.js"), "").unwrap();

        let files = glob_files(&base, "src/*.js").unwrap();
        assert_eq!(files, vec![base.join("src/index.js")]);
    }

    #[test]
    fn test_check_pattern() {
        assert!(check_pattern("src/**/*.js").is_ok());
        assert!(check_pattern("src/[a-").is_err());
    }

    #[test]
    fn test_parent_component() {
        assert!(has_parent_component(Path::new("../src/*.js")));
        assert!(has_parent_component(Path::new("src/../../x")));
        assert!(!has_parent_component(Path::new("src/main/coffee/*")));
    }

    #[test]
    fn test_write_string_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a/b/c.txt");
        write_string(&path, "hi").unwrap();
        assert_eq!(read_to_string(&path).unwrap(), "hi");

        remove_dir_all_if_exists(&tmp.path().join("a")).unwrap();
        assert!(!path.exists());
        remove_dir_all_if_exists(&tmp.path().join("a")).unwrap();
    }
}
