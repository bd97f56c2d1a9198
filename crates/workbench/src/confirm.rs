// Copyright (c) Contributors to the Workbench project.
// SPDX-License-Identifier: Apache-2.0

//! Confirmation gating for destructive operations.

use std::io::BufRead;
use std::path::Path;

#[cfg(test)]
#[path = "./confirm_test.rs"]
mod confirm_test;

/// Outcome of a confirmation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

/// Ask for confirmation on `input`.
///
/// When `auto_confirm` is set no I/O occurs at all, which matters for
/// non-interactive callers. Otherwise a single line is read; only a line
/// beginning with `y` (case-sensitive) confirms. End-of-input declines.
pub fn confirm(auto_confirm: bool, input: &mut impl BufRead) -> crate::Result<Confirmation> {
    if auto_confirm {
        return Ok(Confirmation::Confirmed);
    }

    let mut line = String::new();
    let read = input.read_line(&mut line)?;
    if read == 0 {
        return Ok(Confirmation::Declined);
    }
    if line.starts_with('y') {
        Ok(Confirmation::Confirmed)
    } else {
        Ok(Confirmation::Declined)
    }
}

/// Remove a fragment file behind the confirmation gate.
///
/// On [`Confirmation::Declined`] the filesystem is left untouched and
/// [`crate::Error::Declined`] is returned.
pub fn remove_fragment(
    path: &Path,
    auto_confirm: bool,
    input: &mut impl BufRead,
) -> crate::Result<()> {
    if !path.is_file() {
        return Err(crate::Error::MissingFragment {
            path: path.to_path_buf(),
        });
    }

    match confirm(auto_confirm, input)? {
        Confirmation::Confirmed => {
            std::fs::remove_file(path).map_err(|e| crate::Error::WriteFailed {
                path: path.to_path_buf(),
                error: e,
            })?;
            tracing::info!(path = %path.display(), "removed fragment");
            Ok(())
        }
        Confirmation::Declined => Err(crate::Error::Declined),
    }
}
