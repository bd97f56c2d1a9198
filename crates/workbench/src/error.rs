// Copyright (c) Contributors to the Workbench project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for workbench operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience Result type with workbench Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during workbench operations.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Name violates the trailing-slash convention for its kind
    #[error("Invalid {kind} name: '{name}' ({reason})")]
    #[diagnostic(
        code(workbench::invalid_name),
        help("Shelf names end with '/', bench names do not")
    )]
    InvalidName {
        kind: &'static str,
        name: String,
        reason: String,
    },

    /// Resolved path escapes the workbench root
    #[error("Name '{name}' resolves outside the workbench root {root:?}")]
    #[diagnostic(
        code(workbench::outside_root),
        help("Set WORKBENCH_INSECURE_PATH=1 to disable containment checking")
    )]
    OutsideRoot { name: String, root: PathBuf },

    /// Referenced fragment file does not exist
    #[error("No such fragment: {path:?}")]
    #[diagnostic(code(workbench::missing_fragment))]
    MissingFragment { path: PathBuf },

    /// WORKBENCH_RC was set explicitly but the file is absent
    #[error("Can't find WORKBENCH_RC: '{path}'")]
    #[diagnostic(
        code(workbench::missing_rc),
        help("Unset WORKBENCH_RC or point it at an existing file")
    )]
    MissingRcFile { path: String },

    /// Creation requested but the target fragment already exists
    #[error("Fragment already exists: {path:?}")]
    #[diagnostic(code(workbench::already_exists))]
    AlreadyExists { path: PathBuf },

    /// Destructive action was not confirmed
    #[error("Declined")]
    #[diagnostic(code(workbench::declined))]
    Declined,

    /// WORKBENCH_HOME is unset or does not name a directory
    #[error("WORKBENCH_HOME is not usable: {reason}")]
    #[diagnostic(
        code(workbench::bad_root),
        help("Point WORKBENCH_HOME at the directory holding your shelves and benches")
    )]
    BadRoot { reason: String },

    /// Invalid YAML in a fragment file
    #[error("Invalid fragment file {path:?}: {error}")]
    #[diagnostic(
        code(workbench::invalid_fragment),
        help("Check YAML syntax and ensure 'api: workbench/v0' is present")
    )]
    InvalidFragment {
        path: PathBuf,
        #[source]
        error: serde_yaml::Error,
    },

    /// Failed to read a file
    #[error("Failed to read file: {path:?}")]
    #[diagnostic(code(workbench::read_failed))]
    ReadFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Failed to write a file
    #[error("Failed to write file: {path:?}")]
    #[diagnostic(code(workbench::write_failed))]
    WriteFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Host capability failed to launch or drive a session
    #[error("Failed to execute session: {0}")]
    #[diagnostic(code(workbench::exec_failed))]
    ExecFailed(String),

    /// IO error passthrough
    #[error(transparent)]
    #[diagnostic(code(workbench::io_error))]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Process exit status for this error.
    ///
    /// Exit statuses are part of the compatibility contract; diagnostic
    /// text is informational only.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::MissingFragment { .. } | Error::MissingRcFile { .. } => 3,
            Error::InvalidName { .. } | Error::OutsideRoot { .. } => 4,
            Error::Declined => 5,
            Error::AlreadyExists { .. } => 6,
            _ => 1,
        }
    }
}
