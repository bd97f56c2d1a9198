// Copyright (c) Contributors to the Workbench project.
// SPDX-License-Identifier: Apache-2.0

//! Process configuration from `WORKBENCH_*` variables and the startup rc file.
//!
//! All recognized inputs are read once into an explicit [`Config`] record
//! that is passed by value through composition and execution; nothing here
//! mutates ambient process state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::{DEFAULT_RC_FILENAME, ENV_PREFIX};

#[cfg(test)]
#[path = "./config_test.rs"]
mod config_test;

/// External commands standing in for composed hook invocations.
///
/// Set via `WORKBENCH_EXEC_<HOOK>`; used for non-interactive testing of the
/// hook wiring. When present, a stand-in replaces the composed hook body
/// after all fragments have been applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookOverrides {
    pub new: Option<String>,
    pub activate: Option<String>,
    pub command: Option<String>,
    pub deactivate: Option<String>,
}

/// Resolved process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory all names resolve under, as given. Canonicalized at
    /// the point of use; unset is only an error for operations that actually
    /// resolve names; see [`Config::require_root`].
    pub root: Option<PathBuf>,

    /// Skip confirmation prompts (from `-y|--yes` or `WORKBENCH_YES`).
    pub auto_confirm: bool,

    /// Disable root containment checking (from `WORKBENCH_INSECURE_PATH`).
    pub insecure_path: bool,

    /// Display identifier override for the active environment
    /// (from `WORKBENCH_NAME`).
    pub display_name: Option<String>,

    /// Program performing interactive takeover
    /// (from `WORKBENCH_SHELL`, then `SHELL`, then `/bin/bash`).
    pub shell: String,

    /// Hook invocation stand-ins (from `WORKBENCH_EXEC_*`).
    pub hook_overrides: HookOverrides,

    /// Ordered entries consumed from the startup rc file.
    pub rc_vars: Vec<(String, String)>,
}

impl Config {
    /// Build configuration from the process environment.
    ///
    /// The rc file named by `WORKBENCH_RC` must exist when that variable is
    /// set; the default `~/.workbenchrc` is skipped silently when absent.
    pub fn from_env() -> crate::Result<Self> {
        // WORKBENCH_RC itself can only come from the process environment.
        let rc_vars = load_rc(
            std::env::var("WORKBENCH_RC").ok().as_deref(),
            dirs::home_dir(),
        )?;

        // The rc file is consumed after the inherited environment, so its
        // assignments win, matching startup-file sourcing order.
        let lookup = |name: &str| -> Option<String> {
            rc_vars
                .iter()
                .rev()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
                .or_else(|| std::env::var(name).ok())
        };

        // The root is recorded as given; canonicalization (and failure on a
        // nonexistent directory) happens where names are actually resolved,
        // so root-free operations like `-E` stay usable.
        let root = lookup("WORKBENCH_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            root,
            auto_confirm: truthy(lookup("WORKBENCH_YES")),
            insecure_path: truthy(lookup("WORKBENCH_INSECURE_PATH")),
            display_name: lookup("WORKBENCH_NAME").filter(|v| !v.is_empty()),
            shell: lookup("WORKBENCH_SHELL")
                .or_else(|| std::env::var("SHELL").ok())
                .unwrap_or_else(|| "/bin/bash".to_string()),
            hook_overrides: HookOverrides {
                new: lookup("WORKBENCH_EXEC_NEW"),
                activate: lookup("WORKBENCH_EXEC_ACTIVATE"),
                command: lookup("WORKBENCH_EXEC_COMMAND"),
                deactivate: lookup("WORKBENCH_EXEC_DEACTIVATE"),
            },
            rc_vars,
        })
    }

    /// The root directory, or `BadRoot` when `WORKBENCH_HOME` is unset.
    pub fn require_root(&self) -> crate::Result<&Path> {
        self.root.as_deref().ok_or_else(|| crate::Error::BadRoot {
            reason: "WORKBENCH_HOME is not set".to_string(),
        })
    }

    /// Minimal configuration over a known root, used by tests and embedders.
    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: Some(root.into()),
            auto_confirm: false,
            insecure_path: false,
            display_name: None,
            shell: "/bin/bash".to_string(),
            hook_overrides: HookOverrides::default(),
            rc_vars: Vec::new(),
        }
    }

    /// Reserved-prefix entries visible to `-E`: process environment merged
    /// with rc entries (rc wins), sorted by name.
    pub fn env_entries(&self) -> Vec<(String, String)> {
        let mut merged: BTreeMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(ENV_PREFIX))
            .collect();
        for (k, v) in &self.rc_vars {
            if k.starts_with(ENV_PREFIX) {
                merged.insert(k.clone(), v.clone());
            }
        }
        merged.into_iter().collect()
    }
}

/// Interpret a variable as a boolean switch.
fn truthy(value: Option<String>) -> bool {
    value.is_some_and(|v| matches!(v.as_str(), "1" | "true" | "yes" | "on"))
}

/// Locate and parse the startup rc file.
///
/// An explicitly-set-but-missing path is a hard error; the absent default
/// under `home` is skipped.
pub fn load_rc(
    explicit: Option<&str>,
    home: Option<PathBuf>,
) -> crate::Result<Vec<(String, String)>> {
    let path = match explicit {
        Some(p) => {
            let path = PathBuf::from(p);
            if !path.is_file() {
                return Err(crate::Error::MissingRcFile {
                    path: p.to_string(),
                });
            }
            path
        }
        None => {
            let Some(home) = home else {
                return Ok(Vec::new());
            };
            let path = home.join(DEFAULT_RC_FILENAME);
            if !path.is_file() {
                tracing::debug!(path = %path.display(), "no default rc file");
                return Ok(Vec::new());
            }
            path
        }
    };

    parse_rc_file(&path)
}

/// Parse an rc file of `KEY=VALUE` lines.
///
/// Blank lines and `#` comments are ignored; a leading `export ` is
/// stripped; single or double quotes around the value are stripped.
pub fn parse_rc_file(path: &Path) -> crate::Result<Vec<(String, String)>> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::Error::ReadFailed {
        path: path.to_path_buf(),
        error: e,
    })?;

    let mut vars = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line).trim_start();
        let Some((name, value)) = line.split_once('=') else {
            tracing::warn!(path = %path.display(), line, "ignoring malformed rc line");
            continue;
        };
        vars.push((name.trim().to_string(), unquote(value.trim()).to_string()));
    }
    Ok(vars)
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}
