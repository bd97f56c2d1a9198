// Copyright (c) Contributors to the Workbench project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `wb a` (activate) command.

use clap::Args;
use workbench::{Config, ExecutionMode, Outcome, SessionExecutor, ShellHost};

/// Activate a bench interactively
#[derive(Debug, Args)]
pub struct CmdActivate {
    /// Bench name; omit to list all benches
    pub name: Option<String>,

    /// Print the composed session text instead of executing
    #[clap(long)]
    pub dump: bool,

    /// Arguments forwarded to the hook invocation
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl CmdActivate {
    pub fn run(&self, config: &Config) -> workbench::Result<i32> {
        run_exec(
            config,
            ExecutionMode::Activate,
            self.name.as_deref(),
            &self.args,
            self.dump,
        )
    }
}

/// Shared driver for all three execute modes.
///
/// A missing name degrades to a bench listing. A literal `--dump` at the
/// tail of the forwarded arguments is honored as the dump flag, since
/// anything after the name is otherwise swept into the argument list.
pub(crate) fn run_exec(
    config: &Config,
    mode: ExecutionMode,
    name: Option<&str>,
    args: &[String],
    dump: bool,
) -> workbench::Result<i32> {
    let Some(name) = name else {
        for bench in workbench::list_benches(config.require_root()?)? {
            println!("{bench}");
        }
        return Ok(0);
    };

    let (args, dump) = match args.last() {
        Some(last) if last == "--dump" => (&args[..args.len() - 1], true),
        _ => (args, dump),
    };

    let host = ShellHost::new(config);
    let executor = SessionExecutor::new(config, &host);
    match executor.execute(mode, name, args, dump)? {
        Outcome::Dumped(text) => {
            print!("{text}");
            Ok(0)
        }
        Outcome::Exited(code) => Ok(code),
    }
}
