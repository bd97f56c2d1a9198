// Copyright (c) Contributors to the Workbench project.
// SPDX-License-Identifier: Apache-2.0

//! Composition of an ordered fragment chain into one session descriptor.
//!
//! Later fragments shadow earlier ones by name: re-declaring a hook or a
//! `set` variable replaces the prior binding rather than erroring. The
//! composed result is an explicit mapping, not re-evaluated source text.

use std::fmt::Write as _;
use std::path::PathBuf;

use crate::config::Config;
use crate::fragment::{Fragment, VarOp};
use crate::session::ExecutionMode;

#[cfg(test)]
#[path = "./compose_test.rs"]
mod compose_test;

/// Default separator for append/prepend variable operations.
const DEFAULT_SEPARATOR: &str = ":";

/// Every hook fully bound, defaults filling any gap left by the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHooks {
    pub new: String,
    pub activate: String,
    pub command: String,
    pub deactivate: String,
}

impl Default for ResolvedHooks {
    fn default() -> Self {
        Self {
            new: "echo \"workbench: created ${WORKBENCH_NAME}\"".to_string(),
            activate: ":".to_string(),
            command: "echo \"workbench: no command hook defined\" >&2".to_string(),
            deactivate: ":".to_string(),
        }
    }
}

/// The fully composed, immutable result of a chain: either executed by a
/// host capability or dumped verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDescriptor {
    /// Environment name in effect (display override applied).
    pub name: String,

    /// Mode that produced this descriptor.
    pub mode: ExecutionMode,

    /// Ordered fragment files that contributed to the composition.
    pub chain: Vec<PathBuf>,

    /// Resolved hook implementations.
    pub hooks: ResolvedHooks,

    /// Resolved variable bindings, in first-definition order.
    pub variables: Vec<(String, String)>,

    /// Arguments forwarded to the mode's hook invocation.
    pub forwarded_args: Vec<String>,
}

/// Compose fragments in chain order into a session descriptor.
///
/// Built-in defaults are injected first, then each fragment's hooks and
/// variables apply with last-writer-wins semantics, then any hook stand-ins
/// from the configuration replace the composed bodies.
pub fn compose(
    fragments: &[Fragment],
    name: &str,
    mode: ExecutionMode,
    forwarded_args: &[String],
    config: &Config,
) -> SessionDescriptor {
    let mut hooks = ResolvedHooks::default();
    let mut variables: Vec<(String, String)> = Vec::new();
    let mut chain = Vec::new();

    for fragment in fragments {
        if let Some(path) = &fragment.source_path {
            chain.push(path.clone());
        }

        let set = &fragment.hooks;
        if let Some(body) = &set.new {
            hooks.new = body.clone();
        }
        if let Some(body) = &set.activate {
            hooks.activate = body.clone();
        }
        if let Some(body) = &set.command {
            hooks.command = body.clone();
        }
        if let Some(body) = &set.deactivate {
            hooks.deactivate = body.clone();
        }

        for op in &fragment.variables {
            apply_var(&mut variables, op);
        }
    }

    let overrides = &config.hook_overrides;
    if let Some(body) = &overrides.new {
        hooks.new = body.clone();
    }
    if let Some(body) = &overrides.activate {
        hooks.activate = body.clone();
    }
    if let Some(body) = &overrides.command {
        hooks.command = body.clone();
    }
    if let Some(body) = &overrides.deactivate {
        hooks.deactivate = body.clone();
    }

    let name = config
        .display_name
        .clone()
        .unwrap_or_else(|| name.to_string());

    SessionDescriptor {
        name,
        mode,
        chain,
        hooks,
        variables,
        forwarded_args: forwarded_args.to_vec(),
    }
}

/// Apply one variable operation to the ordered binding list.
fn apply_var(variables: &mut Vec<(String, String)>, op: &VarOp) {
    let position = variables.iter().position(|(name, _)| name == op.name());
    match (op, position) {
        (VarOp::Set(set), Some(i)) => variables[i].1 = set.value.clone(),
        (VarOp::Set(set), None) => variables.push((set.set.clone(), set.value.clone())),
        (VarOp::Append(append), Some(i)) => {
            let sep = append.separator.as_deref().unwrap_or(DEFAULT_SEPARATOR);
            variables[i].1 = format!("{}{sep}{}", variables[i].1, append.value);
        }
        (VarOp::Append(append), None) => {
            variables.push((append.append.clone(), append.value.clone()));
        }
        (VarOp::Prepend(prepend), Some(i)) => {
            let sep = prepend.separator.as_deref().unwrap_or(DEFAULT_SEPARATOR);
            variables[i].1 = format!("{}{sep}{}", prepend.value, variables[i].1);
        }
        (VarOp::Prepend(prepend), None) => {
            variables.push((prepend.prepend.clone(), prepend.value.clone()));
        }
    }
}

impl SessionDescriptor {
    /// Render the descriptor as executable shell text.
    ///
    /// The output is deterministic for an unchanged chain and is
    /// byte-identical whether dumped or handed to the host capability.
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("#!/usr/bin/env bash\n");
        out.push_str("# Composed workbench session\n");

        let chain = self.chain_listing();
        let _ = writeln!(out, "WORKBENCH_NAME={}", quote(&self.name));
        let _ = writeln!(out, "WORKBENCH_MODE={}", quote(self.mode.as_str()));
        let _ = writeln!(out, "WORKBENCH_CHAIN={}", quote(&chain));
        out.push_str("export WORKBENCH_NAME WORKBENCH_MODE WORKBENCH_CHAIN\n");

        for (name, value) in &self.variables {
            let _ = writeln!(out, "export {name}={}", quote(value));
        }

        out.push('\n');
        write_hook(&mut out, "wb_hook_new", &self.hooks.new);
        write_hook(&mut out, "wb_hook_activate", &self.hooks.activate);
        write_hook(&mut out, "wb_hook_command", &self.hooks.command);
        write_hook(&mut out, "wb_hook_deactivate", &self.hooks.deactivate);

        let args = self
            .forwarded_args
            .iter()
            .map(|a| quote(a))
            .collect::<Vec<_>>()
            .join(" ");

        match self.mode {
            ExecutionMode::Activate => {
                out.push_str("PS1=\"(${WORKBENCH_NAME}) ${PS1:-\\$ }\"\n");
                out.push_str("wb_hook_activate\n");
            }
            ExecutionMode::Command => {
                if args.is_empty() {
                    out.push_str("wb_hook_command\n");
                } else {
                    let _ = writeln!(out, "wb_hook_command {args}");
                }
                out.push_str("exit $?\n");
            }
            ExecutionMode::New => {
                if args.is_empty() {
                    out.push_str("wb_hook_new\n");
                } else {
                    let _ = writeln!(out, "wb_hook_new {args}");
                }
                out.push_str("exit $?\n");
            }
        }

        out
    }

    /// The colon-joined chain listing exported as `WORKBENCH_CHAIN`.
    pub fn chain_listing(&self) -> String {
        self.chain
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(":")
    }
}

fn write_hook(out: &mut String, name: &str, body: &str) {
    let _ = writeln!(out, "{name}() {{");
    if body.trim().is_empty() {
        out.push_str("    :\n");
    } else {
        for line in body.lines() {
            let _ = writeln!(out, "    {line}");
        }
    }
    out.push_str("}\n");
}

/// Single-quote a value for shell consumption.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}
