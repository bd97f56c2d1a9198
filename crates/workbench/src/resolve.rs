// Copyright (c) Contributors to the Workbench project.
// SPDX-License-Identifier: Apache-2.0

//! Name validation and resolution against the workbench root.

use std::path::{Component, Path, PathBuf};

use crate::{BENCH_SUFFIX, SHELF_FILENAME};

#[cfg(test)]
#[path = "./resolve_test.rs"]
mod resolve_test;

/// The two structural kinds of fragment names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// Directory-scoped fragment; names end with `/`.
    Shelf,
    /// Leaf fragment; names do not end with `/`.
    Bench,
}

impl NameKind {
    fn as_str(&self) -> &'static str {
        match self {
            NameKind::Shelf => "shelf",
            NameKind::Bench => "bench",
        }
    }
}

/// Resolve a requested name to its absolute fragment file path.
///
/// Validates the trailing-slash convention for `kind`, joins the name onto
/// `root`, canonicalizes the result, and rejects paths that escape the root
/// unless `allow_insecure` is set. Pure validation: existence of the
/// fragment is never checked here.
pub fn resolve(
    root: &Path,
    name: &str,
    kind: NameKind,
    allow_insecure: bool,
) -> crate::Result<PathBuf> {
    if name.is_empty() {
        return Err(invalid(kind, name, "empty name"));
    }
    match kind {
        NameKind::Shelf if !name.ends_with('/') => {
            return Err(invalid(kind, name, "shelf names must end with '/'"));
        }
        NameKind::Bench if name.ends_with('/') => {
            return Err(invalid(kind, name, "bench names must not end with '/'"));
        }
        _ => {}
    }

    let fragment = match kind {
        NameKind::Shelf => {
            let dir = name.trim_end_matches('/');
            root.join(dir).join(SHELF_FILENAME)
        }
        NameKind::Bench => root.join(format!("{name}{BENCH_SUFFIX}")),
    };

    if allow_insecure {
        tracing::warn!(name, "containment checking disabled");
        return Ok(normalize(&fragment));
    }

    let canonical_root = dunce::canonicalize(root).map_err(|e| crate::Error::BadRoot {
        reason: format!("{}: {e}", root.display()),
    })?;
    let canonical = canonicalize_deepest(&normalize(&fragment));

    if !canonical.starts_with(&canonical_root) {
        return Err(crate::Error::OutsideRoot {
            name: name.to_string(),
            root: canonical_root,
        });
    }
    Ok(canonical)
}

/// Remove `.` and `..` components lexically.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never pop past the filesystem root.
                if matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                ) {
                    out.pop();
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Canonicalize the deepest existing ancestor and reattach the remainder.
///
/// Resolves symlinks in the existing portion of the path without requiring
/// the full path to exist yet.
fn canonicalize_deepest(path: &Path) -> PathBuf {
    let mut existing = path.to_path_buf();
    let mut remainder: Vec<std::ffi::OsString> = Vec::new();

    loop {
        if let Ok(canonical) = dunce::canonicalize(&existing) {
            let mut result = canonical;
            for part in remainder.iter().rev() {
                result.push(part);
            }
            return result;
        }
        match existing.file_name() {
            Some(name) => {
                remainder.push(name.to_os_string());
                existing.pop();
            }
            None => return path.to_path_buf(),
        }
    }
}

fn invalid(kind: NameKind, name: &str, reason: &str) -> crate::Error {
    crate::Error::InvalidName {
        kind: kind.as_str(),
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
