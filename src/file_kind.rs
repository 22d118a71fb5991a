//! Bazel file recognition.
//!
//! Maps a file name to the Starlark dialect it is written in. The dialect decides
//! whether directory discovery picks the file up and which `--type` the formatter is
//! told to expect.

use globset::{GlobBuilder, GlobMatcher};
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// `BUILD`, `BUILD.bazel`, `*.BUILD`
    Build,
    /// Starlark extension files (`*.bzl`)
    Bzl,
    /// `WORKSPACE`, `WORKSPACE.bazel`, `WORKSPACE.bzlmod`
    Workspace,
    /// `MODULE.bazel`
    Module,
    /// Plain Starlark (`*.star`, `*.sky`)
    Default,
}

impl FileKind {
    /// Value passed to the formatter's `--type` flag.
    pub fn as_type_arg(&self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Bzl => "bzl",
            Self::Workspace => "workspace",
            Self::Module => "module",
            Self::Default => "default",
        }
    }

    /// Detect the kind of `path` from its file name.
    ///
    /// Returns `None` for files that are not Bazel files.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let name = path.as_ref().file_name()?.to_str()?;
        matchers()
            .iter()
            .find(|(matcher, _)| matcher.is_match(name))
            .map(|(_, kind)| *kind)
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_type_arg())
    }
}

/// Name patterns in match order. Exact names come before the extension globs so that
/// `MODULE.bazel` is not taken for a generic file.
const PATTERNS: &[(&str, FileKind)] = &[
    ("BUILD", FileKind::Build),
    ("BUILD.bazel", FileKind::Build),
    ("WORKSPACE", FileKind::Workspace),
    ("WORKSPACE.bazel", FileKind::Workspace),
    ("WORKSPACE.bzlmod", FileKind::Workspace),
    ("MODULE.bazel", FileKind::Module),
    ("BUILD.*.bazel", FileKind::Build),
    ("*.BUILD", FileKind::Build),
    ("*.bzl", FileKind::Bzl),
    ("*.star", FileKind::Default),
    ("*.sky", FileKind::Default),
];

fn matchers() -> &'static [(GlobMatcher, FileKind)] {
    static MATCHERS: OnceLock<Vec<(GlobMatcher, FileKind)>> = OnceLock::new();
    MATCHERS.get_or_init(|| {
        PATTERNS
            .iter()
            .filter_map(|(pattern, kind)| {
                GlobBuilder::new(pattern)
                    .literal_separator(true)
                    .build()
                    .ok()
                    .map(|glob| (glob.compile_matcher(), *kind))
            })
            .collect()
    })
}
