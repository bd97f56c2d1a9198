// Copyright (c) Contributors to the Workbench project.
// SPDX-License-Identifier: Apache-2.0

//! Chain resolution: ordered fragment discovery from root to leaf.

use std::path::{Path, PathBuf};

use crate::resolve::{resolve, NameKind};
use crate::{BENCH_SUFFIX, SHELF_FILENAME};

#[cfg(test)]
#[path = "./chain_test.rs"]
mod chain_test;

/// The ordered fragment files contributing to one composed session.
///
/// Fragments are ordered root-most first; the terminal fragment is always
/// last and is the only member whose existence is not guaranteed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    /// Ordered fragment file paths, terminal fragment last.
    pub fragments: Vec<PathBuf>,

    /// Whether the terminal fragment existed at resolution time.
    pub terminal_exists: bool,
}

impl Chain {
    /// The terminal fragment path.
    pub fn terminal(&self) -> &Path {
        self.fragments
            .last()
            .expect("a chain always holds its terminal fragment")
    }

    /// Ancestor fragments only (everything but the terminal).
    pub fn ancestors(&self) -> &[PathBuf] {
        &self.fragments[..self.fragments.len() - 1]
    }

    /// Colon-joined fragment paths, suitable for `WORKBENCH_CHAIN`.
    pub fn listing(&self) -> String {
        self.fragments
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(":")
    }
}

/// Build the fragment chain for a bench name.
///
/// Ancestor shelf files are included iff they exist on disk; absence is
/// silently skipped. The bench's own fragment file is always appended last,
/// with its existence reported via [`Chain::terminal_exists`].
pub fn build_chain(root: &Path, bench_name: &str, allow_insecure: bool) -> crate::Result<Chain> {
    let bench = resolve(root, bench_name, NameKind::Bench, allow_insecure)?;

    let mut fragments = match bench.parent() {
        Some(dir) => ancestor_shelves(root, dir),
        None => Vec::new(),
    };
    let terminal_exists = bench.is_file();
    fragments.push(bench);

    tracing::debug!(?fragments, terminal_exists, "resolved chain");
    Ok(Chain {
        fragments,
        terminal_exists,
    })
}

/// Build the degenerate chain for a shelf name: its own ancestor shelves
/// plus the shelf's own fragment file last.
pub fn build_shelf_chain(root: &Path, shelf_name: &str, allow_insecure: bool) -> crate::Result<Chain> {
    let shelf = resolve(root, shelf_name, NameKind::Shelf, allow_insecure)?;

    let mut fragments = match shelf.parent().and_then(Path::parent) {
        Some(dir) => ancestor_shelves(root, dir),
        None => Vec::new(),
    };
    let terminal_exists = shelf.is_file();
    fragments.push(shelf);

    Ok(Chain {
        fragments,
        terminal_exists,
    })
}

/// Existing shelf files from the root down to `leaf_dir`, inclusive.
fn ancestor_shelves(root: &Path, leaf_dir: &Path) -> Vec<PathBuf> {
    let root = dunce::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let mut dirs: Vec<&Path> = Vec::new();
    let mut current = Some(leaf_dir);

    while let Some(dir) = current {
        if !dir.starts_with(&root) {
            // Insecure resolutions may leave the root entirely; such
            // directories contribute no shelves.
            break;
        }
        dirs.push(dir);
        if dir == root {
            break;
        }
        current = dir.parent();
    }
    dirs.reverse();

    dirs.into_iter()
        .filter_map(|dir| {
            let candidate = dir.join(SHELF_FILENAME);
            candidate.is_file().then_some(candidate)
        })
        .collect()
}

/// List every shelf under the root, as trailing-slash names sorted
/// lexicographically. The root's own shelf is listed as `/`.
pub fn list_shelves(root: &Path) -> crate::Result<Vec<String>> {
    let mut names = Vec::new();
    for path in glob_fragments(root, SHELF_FILENAME)? {
        let dir = path.parent().unwrap_or(root);
        let name = match dir.strip_prefix(root) {
            Ok(rel) if rel.as_os_str().is_empty() => "/".to_string(),
            Ok(rel) => format!("{}/", rel.display()),
            Err(_) => continue,
        };
        names.push(name);
    }
    names.sort();
    Ok(names)
}

/// List every bench under the root, as extension-less names sorted
/// lexicographically.
pub fn list_benches(root: &Path) -> crate::Result<Vec<String>> {
    let pattern = format!("*{BENCH_SUFFIX}");
    let mut names = Vec::new();
    for path in glob_fragments(root, &pattern)? {
        let Ok(rel) = path.strip_prefix(root) else {
            continue;
        };
        let rel = rel.display().to_string();
        match rel.strip_suffix(BENCH_SUFFIX) {
            Some(name) if !name.is_empty() => names.push(name.to_string()),
            _ => {}
        }
    }
    names.sort();
    Ok(names)
}

/// Recursively match fragment files under the root.
fn glob_fragments(root: &Path, filename: &str) -> crate::Result<Vec<PathBuf>> {
    let root_str = root.to_string_lossy();
    let pattern = format!("{}/**/{filename}", glob::Pattern::escape(&root_str));

    let mut paths = Vec::new();
    for entry in glob::glob(&pattern).map_err(|e| crate::Error::BadRoot {
        reason: format!("unusable root pattern: {e}"),
    })? {
        let path = entry.map_err(|e| crate::Error::Io(e.into_error()))?;
        if path.is_file() {
            paths.push(path);
        }
    }
    Ok(paths)
}
