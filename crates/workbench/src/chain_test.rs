// Copyright (c) Contributors to the Workbench project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;
use tempfile::TempDir;

use super::*;

/// Lay out the reference hierarchy:
/// shelves at `/`, `outer/`, `outer/inner/`; benches `outer/inner/simple1`
/// and `outer/inner/simple2`.
fn reference_root() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = dunce::canonicalize(tmp.path()).unwrap();

    std::fs::create_dir_all(root.join("outer/inner")).unwrap();
    for dir in ["", "outer", "outer/inner"] {
        std::fs::write(root.join(dir).join(SHELF_FILENAME), "api: workbench/v0\n").unwrap();
    }
    for bench in ["simple1", "simple2"] {
        std::fs::write(
            root.join("outer/inner").join(format!("{bench}{BENCH_SUFFIX}")),
            "api: workbench/v0\n",
        )
        .unwrap();
    }
    (tmp, root)
}

#[rstest]
fn test_chain_order_is_root_to_leaf() {
    let (_tmp, root) = reference_root();

    let chain = build_chain(&root, "outer/inner/simple1", false).unwrap();
    assert_eq!(
        chain.fragments,
        vec![
            root.join(SHELF_FILENAME),
            root.join("outer").join(SHELF_FILENAME),
            root.join("outer/inner").join(SHELF_FILENAME),
            root.join("outer/inner/simple1.bench"),
        ]
    );
    assert!(chain.terminal_exists);
}

#[rstest]
fn test_absent_shelves_are_skipped_silently() {
    let tmp = TempDir::new().unwrap();
    let root = dunce::canonicalize(tmp.path()).unwrap();
    std::fs::create_dir_all(root.join("a/b")).unwrap();
    std::fs::write(root.join("a/b/deep.bench"), "").unwrap();

    let chain = build_chain(&root, "a/b/deep", false).unwrap();
    assert_eq!(chain.fragments, vec![root.join("a/b/deep.bench")]);
    assert!(chain.terminal_exists);
}

#[rstest]
fn test_missing_terminal_is_reported_not_errored() {
    let (_tmp, root) = reference_root();

    let chain = build_chain(&root, "outer/inner/absent", false).unwrap();
    assert!(!chain.terminal_exists);
    assert_eq!(chain.terminal(), root.join("outer/inner/absent.bench"));
    // Ancestor shelves are still collected.
    assert_eq!(chain.ancestors().len(), 3);
}

#[rstest]
fn test_intermediate_gap_in_shelves() {
    let (_tmp, root) = reference_root();
    // Remove only the middle shelf; the chain must keep root and inner.
    std::fs::remove_file(root.join("outer").join(SHELF_FILENAME)).unwrap();

    let chain = build_chain(&root, "outer/inner/simple1", false).unwrap();
    assert_eq!(
        chain.fragments,
        vec![
            root.join(SHELF_FILENAME),
            root.join("outer/inner").join(SHELF_FILENAME),
            root.join("outer/inner/simple1.bench"),
        ]
    );
}

#[rstest]
fn test_shelf_chain_includes_own_ancestors() {
    let (_tmp, root) = reference_root();

    let chain = build_shelf_chain(&root, "outer/inner/", false).unwrap();
    assert_eq!(
        chain.fragments,
        vec![
            root.join(SHELF_FILENAME),
            root.join("outer").join(SHELF_FILENAME),
            root.join("outer/inner").join(SHELF_FILENAME),
        ]
    );
    assert!(chain.terminal_exists);
}

#[rstest]
fn test_root_shelf_chain_has_no_ancestors() {
    let (_tmp, root) = reference_root();

    let chain = build_shelf_chain(&root, "/", false).unwrap();
    assert_eq!(chain.fragments, vec![root.join(SHELF_FILENAME)]);
    assert!(chain.ancestors().is_empty());
}

#[rstest]
fn test_shelf_chain_listing_joins_paths_with_colons() {
    let (_tmp, root) = reference_root();

    let chain = build_shelf_chain(&root, "outer/inner/", false).unwrap();
    let expected = format!(
        "{}:{}:{}",
        root.join(SHELF_FILENAME).display(),
        root.join("outer").join(SHELF_FILENAME).display(),
        root.join("outer/inner").join(SHELF_FILENAME).display(),
    );
    assert_eq!(chain.listing(), expected);
}

#[rstest]
fn test_list_shelves_reference_layout() {
    let (_tmp, root) = reference_root();

    let shelves = list_shelves(&root).unwrap();
    assert_eq!(shelves, vec!["/", "outer/", "outer/inner/"]);
}

#[rstest]
fn test_list_benches_reference_layout() {
    let (_tmp, root) = reference_root();

    let benches = list_benches(&root).unwrap();
    assert_eq!(benches, vec!["outer/inner/simple1", "outer/inner/simple2"]);
}

#[rstest]
fn test_listing_tracks_filesystem_snapshot() {
    let (_tmp, root) = reference_root();

    let extra = root.join("outer/extra.bench");
    std::fs::write(&extra, "").unwrap();
    assert!(list_benches(&root)
        .unwrap()
        .contains(&"outer/extra".to_string()));

    std::fs::remove_file(&extra).unwrap();
    assert!(!list_benches(&root)
        .unwrap()
        .contains(&"outer/extra".to_string()));
}

#[rstest]
fn test_escape_rejected_then_allowed_by_override() {
    let tmp = TempDir::new().unwrap();
    let base = dunce::canonicalize(tmp.path()).unwrap();
    let root = base.join("simple");
    std::fs::create_dir(&root).unwrap();
    std::fs::create_dir_all(base.join("outer/inner")).unwrap();
    std::fs::write(base.join("outer/inner/simple1.bench"), "").unwrap();

    let err = build_chain(&root, "../outer/inner/simple1", false).unwrap_err();
    assert!(matches!(err, crate::Error::OutsideRoot { .. }));

    let chain = build_chain(&root, "../outer/inner/simple1", true).unwrap();
    assert_eq!(chain.terminal(), base.join("outer/inner/simple1.bench"));
    assert!(chain.terminal_exists);
    // Directories outside the root contribute no shelves.
    assert!(chain.ancestors().is_empty());
}
