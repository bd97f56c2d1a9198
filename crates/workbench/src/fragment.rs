// Copyright (c) Contributors to the Workbench project.
// SPDX-License-Identifier: Apache-2.0

//! Fragment file parsing and data types for shelf and bench files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "./fragment_test.rs"]
mod fragment_test;

/// API version for fragment files.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum ApiVersion {
    #[default]
    #[serde(rename = "workbench/v0")]
    V0,
}

/// Helper for two-stage deserialization to determine API version first.
#[derive(Deserialize)]
struct ApiVersionMapping {
    #[serde(default)]
    api: ApiVersion,
}

/// Named lifecycle hooks a fragment may define.
///
/// Each is an optional shell command body. A fragment that omits a hook
/// leaves the previous chain member's definition (or the built-in default)
/// in effect.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct HookSet {
    /// Invoked when a bench is first created (New mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<String>,

    /// Invoked when entering an interactive session (Activate mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activate: Option<String>,

    /// Invoked for one-shot non-interactive runs (Command mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Invoked when an interactive session terminates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deactivate: Option<String>,
}

/// Session variable operations (set, append, prepend).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum VarOp {
    Set(SetVar),
    Append(AppendVar),
    Prepend(PrependVar),
}

/// Rebind a variable, replacing any earlier binding.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SetVar {
    pub set: String,
    pub value: String,
}

/// Extend the current binding at the end.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AppendVar {
    pub append: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
}

/// Extend the current binding at the front.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PrependVar {
    pub prepend: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
}

/// A parsed shelf or bench fragment file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Fragment {
    /// API version identifier.
    #[serde(default)]
    pub api: ApiVersion,

    /// Optional human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Lifecycle hooks defined or overridden by this fragment.
    #[serde(default)]
    pub hooks: HookSet,

    /// Ordered session variable operations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<VarOp>,

    /// Path to the file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Default for Fragment {
    fn default() -> Self {
        Self {
            api: ApiVersion::V0,
            description: None,
            hooks: HookSet::default(),
            variables: Vec::new(),
            source_path: None,
        }
    }
}

impl Fragment {
    /// Parse a fragment from a YAML string.
    pub fn from_yaml(yaml: &str, path: &std::path::Path) -> crate::Result<Self> {
        // Stage 1: Parse to get API version
        let value: serde_yaml::Value =
            serde_yaml::from_str(yaml).map_err(|e| crate::Error::InvalidFragment {
                path: path.to_path_buf(),
                error: e,
            })?;

        // An empty file is a valid fragment defining nothing.
        if matches!(value, serde_yaml::Value::Null) {
            return Ok(Self::default());
        }

        let with_version: ApiVersionMapping =
            serde_yaml::from_value(value.clone()).map_err(|e| crate::Error::InvalidFragment {
                path: path.to_path_buf(),
                error: e,
            })?;

        // Stage 2: Deserialize based on version
        match with_version.api {
            ApiVersion::V0 => {
                serde_yaml::from_value(value).map_err(|e| crate::Error::InvalidFragment {
                    path: path.to_path_buf(),
                    error: e,
                })
            }
        }
    }

    /// Load a fragment from a file path.
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(crate::Error::MissingFragment {
                path: path.to_path_buf(),
            });
        }
        let yaml = std::fs::read_to_string(path).map_err(|e| crate::Error::ReadFailed {
            path: path.to_path_buf(),
            error: e,
        })?;

        let mut fragment = Self::from_yaml(&yaml, path)?;
        fragment.source_path = Some(path.to_path_buf());
        Ok(fragment)
    }
}

impl VarOp {
    /// The variable name this operation targets.
    pub fn name(&self) -> &str {
        match self {
            VarOp::Set(op) => &op.set,
            VarOp::Append(op) => &op.append,
            VarOp::Prepend(op) => &op.prepend,
        }
    }
}

/// Commented starter content for a newly created fragment file.
pub fn starter_template(kind: crate::resolve::NameKind) -> String {
    let scope = match kind {
        crate::resolve::NameKind::Shelf => "every bench nested under this directory",
        crate::resolve::NameKind::Bench => "this bench only",
    };
    format!(
        "# workbench fragment\n\
        # Hooks and variables here apply to {scope}.\n\
        # Later chain members override earlier ones by name.\n\
        \n\
        api: workbench/v0\n\
        \n\
        # description: \"What this environment is for\"\n\
        \n\
        # hooks:\n\
        #   new: \"git init $WORKBENCH_PATH\"\n\
        #   activate: \"echo entering $WORKBENCH_NAME\"\n\
        #   command: \"make\"\n\
        #   deactivate: \"echo leaving $WORKBENCH_NAME\"\n\
        \n\
        # variables:\n\
        #   - set: PROJECT_ROOT\n\
        #     value: ~/src/project\n\
        #   - prepend: PATH\n\
        #     value: ~/bin\n"
    )
}
