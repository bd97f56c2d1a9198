// Copyright (c) Contributors to the Workbench project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `wb c` (one-shot command) command.

use clap::Args;
use workbench::{Config, ExecutionMode};

/// Run a bench's command hook non-interactively
#[derive(Debug, Args)]
pub struct CmdRun {
    /// Bench name; omit to list all benches
    pub name: Option<String>,

    /// Print the composed session text instead of executing
    #[clap(long)]
    pub dump: bool,

    /// Arguments forwarded to the command hook
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl CmdRun {
    pub fn run(&self, config: &Config) -> workbench::Result<i32> {
        super::cmd_activate::run_exec(
            config,
            ExecutionMode::Command,
            self.name.as_deref(),
            &self.args,
            self.dump,
        )
    }
}
