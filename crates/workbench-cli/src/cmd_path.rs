// Copyright (c) Contributors to the Workbench project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `wb s` and `wb b` path commands.

use std::path::Path;
use std::process::Command;

use clap::Args;
use colored::Colorize;
use workbench::{Config, NameKind};

/// Resolve a shelf path, or list all shelves
#[derive(Debug, Args)]
pub struct CmdShelf {
    #[clap(flatten)]
    inner: PathArgs,
}

impl CmdShelf {
    pub fn run(&self, config: &Config) -> workbench::Result<i32> {
        self.inner.run(config, NameKind::Shelf)
    }
}

/// Resolve a bench path, or list all benches
#[derive(Debug, Args)]
pub struct CmdBench {
    #[clap(flatten)]
    inner: PathArgs,
}

impl CmdBench {
    pub fn run(&self, config: &Config) -> workbench::Result<i32> {
        self.inner.run(config, NameKind::Bench)
    }
}

#[derive(Debug, Args)]
struct PathArgs {
    /// Fragment name; omit to list all fragments of this kind
    name: Option<String>,

    /// Create the fragment file if absent
    #[clap(short = 'n', long = "new")]
    new: bool,

    /// Auto-confirm destructive actions
    #[clap(short = 'y', long = "yes")]
    yes: bool,

    /// Command to run with the resolved path, or 'rm' to remove the fragment
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

impl PathArgs {
    fn run(&self, config: &Config, kind: NameKind) -> workbench::Result<i32> {
        let root = config.require_root()?;

        let Some(name) = self.name.as_deref() else {
            let names = match kind {
                NameKind::Shelf => workbench::list_shelves(root)?,
                NameKind::Bench => workbench::list_benches(root)?,
            };
            for name in names {
                println!("{name}");
            }
            return Ok(0);
        };

        let path = workbench::resolve(root, name, kind, config.insecure_path)?;

        if self.new && !path.is_file() {
            workbench::create_fragment_file(&path, kind)?;
        }

        if self.command.first().map(String::as_str) == Some("rm") && self.command.len() == 1 {
            return self.remove(config, &path);
        }

        if !self.command.is_empty() {
            let chain = match kind {
                NameKind::Shelf => workbench::build_shelf_chain(root, name, config.insecure_path)?,
                NameKind::Bench => workbench::build_chain(root, name, config.insecure_path)?,
            };
            return run_with_path(root, &path, &chain, &self.command);
        }

        println!("{}", path.display());
        Ok(0)
    }

    fn remove(&self, config: &Config, path: &Path) -> workbench::Result<i32> {
        let auto = self.yes || config.auto_confirm;
        if !auto {
            eprint!("{} {} [y/N] ", "Remove".bold(), path.display());
        }
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        workbench::remove_fragment(path, auto, &mut input)?;
        Ok(0)
    }
}

/// Run a free-form command with the fragment's directory as working context.
fn run_with_path(
    root: &Path,
    path: &Path,
    chain: &workbench::Chain,
    command: &[String],
) -> workbench::Result<i32> {
    let dir = path
        .parent()
        .filter(|p| p.is_dir())
        .unwrap_or(root)
        .to_path_buf();

    let status = Command::new(&command[0])
        .args(&command[1..])
        .current_dir(dir)
        .env("WORKBENCH_PATH", path)
        .env("WORKBENCH_CHAIN", chain.listing())
        .status()
        .map_err(|e| workbench::Error::ExecFailed(format!("{}: {e}", command[0])))?;
    Ok(status.code().unwrap_or(1))
}
