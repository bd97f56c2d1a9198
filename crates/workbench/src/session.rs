// Copyright (c) Contributors to the Workbench project.
// SPDX-License-Identifier: Apache-2.0

//! Session execution: strategy selection and host capability handoff.

use std::io::Write as _;
use std::path::Path;
use std::process::Command;

use crate::chain::build_chain;
use crate::compose::{compose, SessionDescriptor};
use crate::config::Config;
use crate::fragment::{starter_template, Fragment};
use crate::resolve::NameKind;

#[cfg(test)]
#[path = "./session_test.rs"]
mod session_test;

/// Execution strategy for a composed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Interactive takeover of the calling terminal.
    Activate,
    /// One-shot, non-interactive invocation of the command hook.
    Command,
    /// Creation of a new bench plus invocation of the creation hook.
    New,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Activate => "activate",
            ExecutionMode::Command => "command",
            ExecutionMode::New => "new",
        }
    }
}

/// Narrow capability through which composed sessions are attached to a
/// live command interpreter. The interactive-session mechanics themselves
/// live outside this engine.
pub trait HostSession {
    /// Become the descriptor's session; blocks for the lifetime of the
    /// nested interactive session and returns its exit status.
    fn takeover_interactive(&self, descriptor: &SessionDescriptor) -> crate::Result<i32>;

    /// Run the descriptor non-interactively and return its exit status.
    fn run_once(&self, descriptor: &SessionDescriptor, args: &[String]) -> crate::Result<i32>;
}

/// Host implementation driving the configured shell.
pub struct ShellHost {
    shell: String,
}

impl ShellHost {
    pub fn new(config: &Config) -> Self {
        Self {
            shell: config.shell.clone(),
        }
    }
}

impl HostSession for ShellHost {
    fn takeover_interactive(&self, descriptor: &SessionDescriptor) -> crate::Result<i32> {
        let script = write_script(descriptor)?;
        tracing::info!(name = %descriptor.name, shell = %self.shell, "entering session");
        let status = Command::new(&self.shell)
            .arg("--rcfile")
            .arg(script.path())
            .status()
            .map_err(|e| crate::Error::ExecFailed(format!("{}: {e}", self.shell)))?;
        Ok(status.code().unwrap_or(1))
    }

    fn run_once(&self, descriptor: &SessionDescriptor, args: &[String]) -> crate::Result<i32> {
        let script = write_script(descriptor)?;
        let status = Command::new(&self.shell)
            .arg(script.path())
            .args(args)
            .status()
            .map_err(|e| crate::Error::ExecFailed(format!("{}: {e}", self.shell)))?;
        Ok(status.code().unwrap_or(1))
    }
}

/// Persist the rendered descriptor for the host shell to consume.
fn write_script(descriptor: &SessionDescriptor) -> crate::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("wb-session-")
        .suffix(".sh")
        .tempfile()?;
    file.write_all(descriptor.render().as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// Result of driving one execution strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `--dump` was requested: the composed text, verbatim.
    Dumped(String),
    /// The host capability ran and returned this exit status.
    Exited(i32),
}

/// Chooses and drives an execution strategy against a composed descriptor.
pub struct SessionExecutor<'a> {
    config: &'a Config,
    host: &'a dyn HostSession,
}

impl<'a> SessionExecutor<'a> {
    pub fn new(config: &'a Config, host: &'a dyn HostSession) -> Self {
        Self { config, host }
    }

    /// Resolve, compose, and execute (or dump) the named bench.
    pub fn execute(
        &self,
        mode: ExecutionMode,
        bench_name: &str,
        args: &[String],
        dump: bool,
    ) -> crate::Result<Outcome> {
        let root = self.config.require_root()?;
        let chain = build_chain(root, bench_name, self.config.insecure_path)?;

        match mode {
            ExecutionMode::Activate | ExecutionMode::Command => {
                if !chain.terminal_exists {
                    return Err(crate::Error::MissingFragment {
                        path: chain.terminal().to_path_buf(),
                    });
                }
                let fragments = load_fragments(&chain.fragments)?;
                let descriptor = compose(&fragments, bench_name, mode, args, self.config);

                if dump {
                    return Ok(Outcome::Dumped(descriptor.render()));
                }

                match mode {
                    ExecutionMode::Activate => {
                        // The deactivation hook must run on every exit path
                        // from the takeover scope, normal or abnormal.
                        let _guard = DeactivateGuard::new(&descriptor, &self.config.shell);
                        let status = self.host.takeover_interactive(&descriptor)?;
                        Ok(Outcome::Exited(status))
                    }
                    _ => Ok(Outcome::Exited(self.host.run_once(&descriptor, args)?)),
                }
            }
            ExecutionMode::New => {
                if chain.terminal_exists {
                    return Err(crate::Error::AlreadyExists {
                        path: chain.terminal().to_path_buf(),
                    });
                }
                // Hook semantics for a new bench come from the nearest
                // existing ancestor shelf; the terminal is not read.
                let fragments = load_fragments(chain.ancestors())?;
                let descriptor =
                    compose(&fragments, bench_name, ExecutionMode::New, args, self.config);

                if dump {
                    return Ok(Outcome::Dumped(descriptor.render()));
                }

                create_fragment_file(chain.terminal(), NameKind::Bench)?;
                Ok(Outcome::Exited(self.host.run_once(&descriptor, args)?))
            }
        }
    }
}

/// Load every fragment in an already-resolved chain.
fn load_fragments(paths: &[std::path::PathBuf]) -> crate::Result<Vec<Fragment>> {
    paths.iter().map(Fragment::load).collect()
}

/// Write a starter fragment file, creating parent directories as needed.
pub fn create_fragment_file(path: &Path, kind: NameKind) -> crate::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| crate::Error::WriteFailed {
            path: parent.to_path_buf(),
            error: e,
        })?;
    }
    std::fs::write(path, starter_template(kind)).map_err(|e| crate::Error::WriteFailed {
        path: path.to_path_buf(),
        error: e,
    })?;
    tracing::info!(path = %path.display(), "created fragment");
    Ok(())
}

/// Runs the in-effect deactivation hook when the takeover scope ends.
struct DeactivateGuard<'a> {
    descriptor: &'a SessionDescriptor,
    shell: &'a str,
}

impl<'a> DeactivateGuard<'a> {
    fn new(descriptor: &'a SessionDescriptor, shell: &'a str) -> Self {
        Self { descriptor, shell }
    }
}

impl Drop for DeactivateGuard<'_> {
    fn drop(&mut self) {
        let mut command = Command::new(self.shell);
        command
            .arg("-c")
            .arg(&self.descriptor.hooks.deactivate)
            .env("WORKBENCH_NAME", &self.descriptor.name)
            .env("WORKBENCH_MODE", self.descriptor.mode.as_str())
            .env("WORKBENCH_CHAIN", self.descriptor.chain_listing());
        for (name, value) in &self.descriptor.variables {
            command.env(name, value);
        }
        if let Err(e) = command.status() {
            tracing::warn!("deactivation hook failed to run: {e}");
        }
    }
}
