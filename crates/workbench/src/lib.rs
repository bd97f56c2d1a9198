// Copyright (c) Contributors to the Workbench project.
// SPDX-License-Identifier: Apache-2.0

//! workbench - Hierarchical Workbench Environment Manager
//!
//! This crate provides the core library for managing hierarchically-nested,
//! named environments stored as flat files under a single root directory.
//!
//! # Overview
//!
//! A *shelf* is a directory-scoped fragment (`wb.shelf`) shared by everything
//! nested beneath its directory; a *bench* is a leaf fragment
//! (`<name>.bench`) representing one concrete environment. Resolving a bench
//! walks the hierarchy from the root down to the leaf, collecting every
//! shelf that exists along the way, and composes the ordered chain into a
//! single session descriptor where later fragments override earlier ones.
//!
//! # Example
//!
//! ```yaml
//! # outer/inner/simple1.bench
//! api: workbench/v0
//! description: "A bench two shelves deep"
//!
//! hooks:
//!   activate: "echo entering simple1"
//!   command: "make -C $WORKBENCH_PATH"
//!
//! variables:
//!   - set: PROJECT
//!     value: simple1
//!   - prepend: PATH
//!     value: ~/bin
//! ```

pub mod chain;
pub mod compose;
pub mod config;
pub mod confirm;
pub mod error;
pub mod fragment;
pub mod resolve;
pub mod session;

pub use chain::{build_chain, build_shelf_chain, list_benches, list_shelves, Chain};
pub use compose::{compose, ResolvedHooks, SessionDescriptor};
pub use config::{Config, HookOverrides};
pub use confirm::{confirm, remove_fragment, Confirmation};
pub use error::{Error, Result};
pub use fragment::{starter_template, Fragment, HookSet, VarOp};
pub use resolve::{resolve, NameKind};
pub use session::{
    create_fragment_file, ExecutionMode, HostSession, Outcome, SessionExecutor, ShellHost,
};

/// Well-known filename for shelf fragments, identical at every level.
pub const SHELF_FILENAME: &str = "wb.shelf";

/// Filename suffix for bench fragments.
pub const BENCH_SUFFIX: &str = ".bench";

/// Reserved prefix for workbench environment variables.
pub const ENV_PREFIX: &str = "WORKBENCH_";

/// Default startup rc filename under the caller's home directory.
pub const DEFAULT_RC_FILENAME: &str = ".workbenchrc";
