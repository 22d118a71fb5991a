//! Finding Bazel files to format.
//!
//! Explicit file arguments are always formatted, whatever their name. Directory
//! arguments are walked with the `ignore` crate and only files with a recognised
//! [`FileKind`] are kept.

use crate::file_kind::FileKind;
use ignore::WalkBuilder;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Failed to walk {path}: {source}")]
    Walk { path: String, source: ignore::Error },
}

/// Collect files from `paths`, sorted and without duplicates.
pub fn find_bazel_files<P: AsRef<Path>>(paths: &[P], respect_gitignore: bool) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut files = BTreeSet::new();

    for path in paths {
        let path = path.as_ref();
        if path.is_file() {
            files.insert(clean_path(path));
            continue;
        }
        if !path.is_dir() {
            return Err(DiscoveryError::PathNotFound(path.display().to_string()));
        }

        let mut walk_builder = WalkBuilder::new(path);
        walk_builder.ignore(respect_gitignore);
        walk_builder.git_ignore(respect_gitignore);
        walk_builder.git_global(respect_gitignore);
        walk_builder.git_exclude(respect_gitignore);
        walk_builder.parents(respect_gitignore);
        walk_builder.hidden(true); // Keep hidden files ignored unconditionally
        walk_builder.require_git(false); // Process git ignores even if no repo detected
        // Bazel output trees are symlinks named bazel-*; never descend into them
        walk_builder.filter_entry(|entry| {
            entry.depth() == 0 || !entry.file_name().to_str().is_some_and(|name| name.starts_with("bazel-"))
        });

        for result in walk_builder.build() {
            let entry = result.map_err(|source| DiscoveryError::Walk {
                path: path.display().to_string(),
                source,
            })?;
            let entry_path = entry.path();
            if entry_path.is_file() && FileKind::from_path(entry_path).is_some() {
                files.insert(clean_path(entry_path));
            }
        }
    }

    log::debug!("Discovered {} Bazel file(s)", files.len());
    Ok(files.into_iter().collect())
}

fn clean_path(path: &Path) -> PathBuf {
    path.strip_prefix("./").unwrap_or(path).to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_walk_selects_bazel_files() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        touch(root, "BUILD.bazel");
        touch(root, "MODULE.bazel");
        touch(root, "pkg/BUILD");
        touch(root, "pkg/defs.bzl");
        touch(root, "pkg/main.cc");
        touch(root, "README.md");

        let files = find_bazel_files(&[root], true).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["BUILD.bazel", "MODULE.bazel", "pkg/BUILD", "pkg/defs.bzl"]);
    }

    #[test]
    fn test_gitignore_respected() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(".gitignore"), "third_party/\n").unwrap();
        touch(root, "BUILD");
        touch(root, "third_party/BUILD");

        assert_eq!(find_bazel_files(&[root], true).unwrap().len(), 1);
        assert_eq!(find_bazel_files(&[root], false).unwrap().len(), 2);
    }

    #[test]
    fn test_bazel_output_dirs_skipped() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        touch(root, "BUILD");
        touch(root, "bazel-out/k8-fastbuild/bin/BUILD");

        assert_eq!(find_bazel_files(&[root], true).unwrap(), vec![root.join("BUILD")]);
    }

    #[test]
    fn test_explicit_file_always_included() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("custom_rules.txt");
        fs::write(&file, "").unwrap();

        let files = find_bazel_files(&[&file], true).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_missing_path_is_error() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("nope");
        assert!(matches!(
            find_bazel_files(&[missing], true),
            Err(DiscoveryError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_duplicates_collapsed() {
        let temp_dir = tempdir().unwrap();
        touch(temp_dir.path(), "BUILD");
        let file = temp_dir.path().join("BUILD");
        let files = find_bazel_files(&[temp_dir.path().to_path_buf(), file], true).unwrap();
        assert_eq!(files.len(), 1);
    }
}
